use std::{future::Future, sync::Arc};

use color_eyre::eyre::Result;
use futures::future::BoxFuture;

use crate::{
    core::cmd::FetchRequest,
    domain::{Cursor, Page},
};

pub type FetchFuture<T> = BoxFuture<'static, Result<Page<T>>>;

/// The data source of a page accumulator
///
/// Implementations perform one page request for the given parameters and
/// continuation cursor. They must be safe to call repeatedly; the engine
/// retries failed calls and never deduplicates identical requests itself.
/// Cancellation is not required: results of superseded sessions are ignored.
pub trait PageFetcher<P, T>: Send + Sync + 'static {
    fn fetch(&self, params: P, cursor: Cursor) -> FetchFuture<T>;
}

impl<P, T, F: PageFetcher<P, T> + ?Sized> PageFetcher<P, T> for Arc<F> {
    fn fetch(&self, params: P, cursor: Cursor) -> FetchFuture<T> {
        (**self).fetch(params, cursor)
    }
}

/// Adapter turning an async closure into a [`PageFetcher`]
///
/// # Examples
///
/// ```
/// use feedpager::domain::{Cursor, Page};
/// use feedpager::infrastructure::fetcher::{fetcher_fn, PageFetcher};
///
/// let fetcher = fetcher_fn(|query: String, cursor: Cursor| async move {
///     Ok(Page::new(vec![format!("{query}@{cursor}")], ""))
/// });
/// let _future = fetcher.fetch("shoes".to_string(), Cursor::start());
/// ```
#[derive(Clone)]
pub struct FnFetcher<F> {
    inner: F,
}

pub fn fetcher_fn<P, T, F, Fut>(inner: F) -> FnFetcher<F>
where
    F: Fn(P, Cursor) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    FnFetcher { inner }
}

impl<P, T, F, Fut> PageFetcher<P, T> for FnFetcher<F>
where
    F: Fn(P, Cursor) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    fn fetch(&self, params: P, cursor: Cursor) -> FetchFuture<T> {
        Box::pin((self.inner)(params, cursor))
    }
}

/// Run a fetch request, retrying failures up to `max_attempts` calls in total
///
/// Returns the number of attempts made when every attempt failed.
pub async fn fetch_with_retry<P, T, F>(
    fetcher: &F,
    request: &FetchRequest<P>,
    max_attempts: usize,
) -> Result<Page<T>, usize>
where
    P: Clone,
    F: PageFetcher<P, T> + ?Sized,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match fetcher
            .fetch(request.params.clone(), request.cursor.clone())
            .await
        {
            Ok(page) => return Ok(page),
            Err(e) => {
                log::warn!(
                    "Fetch for cursor '{}' failed (attempt {attempt}/{max_attempts}): {e}",
                    request.cursor
                );
            }
        }
    }
    Err(max_attempts)
}
