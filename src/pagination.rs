//! Marker-driven pagination
//!
//! Turns a "fetch one page for this marker" call into a lazy, single-pass
//! stream of pages. The stream ends when a page carries no continuation
//! marker, or right after the first failed page.

use futures::stream::{self, Stream, StreamExt};
use std::future::Future;

use crate::api::MarkerPage;
use crate::error::ApiError;

enum Cursor {
    Start,
    Marker(String),
    Done,
}

/// Stream every page of a marker-paginated listing.
///
/// A failed page is yielded once as `Err` and terminates the stream.
pub fn pages<P, F, Fut>(fetch: F) -> impl Stream<Item = Result<P, ApiError>>
where
    P: MarkerPage,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    stream::unfold((fetch, Cursor::Start), |(mut fetch, cursor)| async move {
        let marker = match cursor {
            Cursor::Start => None,
            Cursor::Marker(marker) => Some(marker),
            Cursor::Done => return None,
        };

        match fetch(marker).await {
            Ok(page) => {
                let next = match page.next_marker() {
                    Some(marker) if !marker.is_empty() => Cursor::Marker(marker.to_string()),
                    _ => Cursor::Done,
                };
                Some((Ok(page), (fetch, next)))
            }
            Err(e) => Some((Err(e), (fetch, Cursor::Done))),
        }
    })
}

/// Stream every item across all pages, in page order.
pub fn items<P, F, Fut>(fetch: F) -> impl Stream<Item = Result<P::Item, ApiError>>
where
    P: MarkerPage,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    pages(fetch).flat_map(|page| {
        let batch: Vec<Result<P::Item, ApiError>> = match page {
            Ok(page) => page.into_items().into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(batch)
    })
}
