/* src/persist/adapter/file.rs */

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::super::{PersistError, PersistenceAdapter};

/// A file system adapter backed by tokio::fs.
///
/// Each key maps to one file under `root`. Writes go to a hidden temporary
/// file first and are renamed into place, so a crash or an aborted task never
/// leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct FilePersistence {
	root: PathBuf,
}

impl FilePersistence {
	/// Create a new FilePersistence rooted at the given path.
	///
	/// The directory is created on first save.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves the path safely, ensuring it stays within the root directory.
	fn resolve(&self, key: &str) -> Result<PathBuf, PersistError> {
		let relative = Path::new(key);
		if key.is_empty()
			|| !relative
				.components()
				.all(|component| matches!(component, Component::Normal(_)))
		{
			return Err(PersistError::SandboxViolation(key.to_string()));
		}
		Ok(self.root.join(relative))
	}

	fn temp_path(path: &Path) -> PathBuf {
		let name = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();
		path.with_file_name(format!(".{name}.tmp"))
	}
}

#[async_trait]
impl PersistenceAdapter for FilePersistence {
	async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
		let path = self.resolve(key)?;
		match fs::read(&path).await {
			Ok(bytes) => Ok(Some(bytes)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(PersistError::Io(e)),
		}
	}

	async fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
		let path = self.resolve(key)?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		let temp = Self::temp_path(&path);
		fs::write(&temp, blob).await?;
		if let Err(e) = fs::rename(&temp, &path).await {
			let _ = fs::remove_file(&temp).await;
			return Err(PersistError::Io(e));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_escaping_keys() {
		let adapter = FilePersistence::new("/tmp/rosterwatch");
		for key in ["../etc/passwd", "/abs/path", "a/../../b", ""] {
			assert!(
				matches!(adapter.resolve(key), Err(PersistError::SandboxViolation(_))),
				"key {key:?} should be rejected"
			);
		}
		assert!(adapter.resolve("nested/snapshot.json").is_ok());
	}

	#[test]
	fn temp_file_is_hidden_sibling() {
		let temp = FilePersistence::temp_path(Path::new("/data/snapshot.json"));
		assert_eq!(temp, PathBuf::from("/data/.snapshot.json.tmp"));
	}
}
