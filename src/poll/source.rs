/* src/poll/source.rs */

use std::future::Future;

use async_trait::async_trait;

use super::{FetchError, RemoteSource};
use crate::engine::RawItem;

/// A [`RemoteSource`] backed by an async closure.
pub struct FnSource<F> {
	f: F,
}

/// Wraps `f` as a remote source. The closure receives the collection key.
///
/// ```ignore
/// let source = source_fn(|key: String| async move {
///     api.list_registrations(&key).await.map_err(|e| FetchError::Network(e.to_string()))
/// });
/// ```
pub fn source_fn<F, Fut>(f: F) -> FnSource<F>
where
	F: Fn(String) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Vec<RawItem>, FetchError>> + Send + 'static,
{
	FnSource { f }
}

#[async_trait]
impl<F, Fut> RemoteSource for FnSource<F>
where
	F: Fn(String) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Vec<RawItem>, FetchError>> + Send + 'static,
{
	async fn fetch(&self, collection: &str) -> Result<Vec<RawItem>, FetchError> {
		(self.f)(collection.to_string()).await
	}
}

impl<F> std::fmt::Debug for FnSource<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FnSource").finish_non_exhaustive()
	}
}
