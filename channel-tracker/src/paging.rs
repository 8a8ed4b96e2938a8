//! Lazily paged streams over list endpoints.

use crate::Result;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type PageFuture<'a, F, T> =
    Pin<Box<dyn Future<Output = Result<(F, (VecDeque<T>, Option<String>))>> + 'a + Send>>;

/// Where a [`PagedStream`] is between pages.
enum Cursor<'a, T, F> {
    /// A page request is in flight. It hands the fetcher back together with the page.
    Fetching(PageFuture<'a, F, T>),
    /// Buffered items are all that is left.
    Exhausted,
}

/// A stream that yields items one by one, fetching the next page only once the current one is
/// exhausted.
///
/// The fetcher receives `None` for the first page and afterwards whatever continuation the
/// previous page returned (a page token or a full `next` URL, depending on the API). A page
/// without a continuation ends the stream. An error ends the stream after being yielded.
pub struct PagedStream<'a, T, F> {
    buffered: VecDeque<T>,
    cursor: Cursor<'a, T, F>,
}

fn fetch_page<'a, T, F, Fut>(fetcher: F, continuation: Option<String>) -> PageFuture<'a, F, T>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(VecDeque<T>, Option<String>)>> + Send + 'a,
{
    Box::pin(async move {
        let page = fetcher(continuation).await?;
        Ok((fetcher, page))
    })
}

impl<'a, T, F> PagedStream<'a, T, F> {
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(VecDeque<T>, Option<String>)>> + Send + 'a,
    {
        Self {
            buffered: VecDeque::new(),
            cursor: Cursor::Fetching(fetch_page(fetcher, None)),
        }
    }
}

impl<T: Unpin, F> Unpin for PagedStream<'_, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(VecDeque<T>, Option<String>)>> + Send + 'a,
{
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        loop {
            // drain what we have before touching the network again
            if let Some(item) = this.buffered.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            let Cursor::Fetching(page) = &mut this.cursor else {
                return Poll::Ready(None);
            };

            match page.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    this.cursor = Cursor::Exhausted;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Ok((fetcher, (items, continuation)))) => {
                    this.buffered.extend(items);
                    // the follow-up request is created now but first polled once the
                    // buffer runs dry; an empty page with a continuation just loops
                    this.cursor = match continuation {
                        Some(next) => Cursor::Fetching(fetch_page(fetcher, Some(next))),
                        None => Cursor::Exhausted,
                    };
                }
            }
        }
    }
}
