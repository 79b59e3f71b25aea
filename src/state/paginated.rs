//! Page-at-a-time listing over a server-paginated endpoint.
//!
//! DESIGN
//! ======
//! `Paginated` keeps the page cursor, the current page's items and the
//! server-reported `PageMeta` in one `watch` channel. Moving the cursor
//! re-fetches when auto-fetch is on. Cursor moves past a known boundary are
//! no-ops and report `false`. Fetches share the generation rule of
//! `Resource`: only the latest call writes state.

#[cfg(test)]
#[path = "paginated_test.rs"]
mod paginated_test;

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;

use super::fetch::{FetchOptions, Generation};
use crate::net::error::ApiError;
use crate::net::types::{Page, PageRequest};

type PageFetcher<T> = Arc<dyn Fn(PageRequest) -> BoxFuture<'static, Result<Page<T>, ApiError>> + Send + Sync>;

/// Server-reported pagination facts for the last loaded page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl Default for PageMeta {
    /// Nothing loaded yet: a single empty page, so both directions are
    /// closed until the server says otherwise.
    fn default() -> Self {
        Self { total_elements: 0, total_pages: 0, first: true, last: true }
    }
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self { total_elements: page.total_elements, total_pages: page.total_pages, first: page.first, last: page.last }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaginatedState<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub meta: PageMeta,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct Paginated<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    fetcher: PageFetcher<T>,
    options: FetchOptions<Page<T>>,
    state: watch::Sender<PaginatedState<T>>,
    generation: Generation,
}

impl<T> Clone for Paginated<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Paginated<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Listing starting at `initial` that re-fetches on every cursor move.
    pub fn new<F, Fut>(fetcher: F, initial: PageRequest) -> Self
    where
        F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'static,
    {
        Self::with_options(fetcher, initial, FetchOptions::immediate())
    }

    /// As [`Paginated::new`]; `options.immediate` turns auto-fetch on mount
    /// and on cursor moves on or off.
    pub fn with_options<F, Fut>(fetcher: F, initial: PageRequest, options: FetchOptions<Page<T>>) -> Self
    where
        F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'static,
    {
        let fetcher: PageFetcher<T> = Arc::new(move |request| fetcher(request).boxed());
        let (state, _) = watch::channel(PaginatedState {
            items: Vec::new(),
            page: initial.page,
            size: initial.size.max(1),
            meta: PageMeta::default(),
            loading: false,
            error: None,
        });
        Self { inner: Arc::new(Inner { fetcher, options, state, generation: Generation::default() }) }
    }

    #[must_use]
    pub fn state(&self) -> PaginatedState<T> {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PaginatedState<T>> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn request(&self) -> PageRequest {
        let state = self.inner.state.borrow();
        PageRequest { page: state.page, size: state.size }
    }

    /// Initial load when auto-fetch is on.
    pub async fn mount(&self) {
        if self.inner.options.immediate {
            if let Err(e) = self.fetch().await {
                tracing::debug!(error = %e, "initial page fetch failed");
            }
        }
    }

    /// Load the page under the cursor.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error. Items and meta from the last good page
    /// stay in place.
    pub async fn fetch(&self) -> Result<Page<T>, ApiError> {
        let request = self.request();
        let ticket = self.inner.generation.begin();
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = (self.inner.fetcher)(request).await;

        if !self.inner.generation.is_current(ticket) {
            tracing::debug!(ticket, page = request.page, "discarding stale page");
            return result;
        }
        match &result {
            Ok(page) => {
                self.inner.state.send_modify(|state| {
                    state.items.clone_from(&page.content);
                    state.meta = PageMeta::from(page);
                    state.loading = false;
                });
                if let Some(hook) = &self.inner.options.on_success {
                    hook(page);
                }
            }
            Err(e) => {
                self.inner.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(e.message.clone());
                });
                if let Some(hook) = &self.inner.options.on_error {
                    hook(e);
                }
            }
        }
        result
    }

    // =========================================================================
    // CURSOR
    // =========================================================================

    /// Advance one page unless the server reported the last one.
    pub async fn next_page(&self) -> bool {
        self.move_to(|state| (!state.meta.last).then(|| state.page + 1)).await
    }

    /// Step back one page unless the server reported the first one.
    pub async fn prev_page(&self) -> bool {
        self.move_to(|state| (!state.meta.first && state.page > 0).then(|| state.page - 1)).await
    }

    /// Jump to `page`. No-op for the current page, or past the end when the
    /// page count is known.
    pub async fn go_to_page(&self, page: u32) -> bool {
        self.move_to(|state| {
            let known_end = state.meta.total_pages > 0 && page >= state.meta.total_pages;
            (page != state.page && !known_end).then_some(page)
        })
        .await
    }

    /// Change the page size and return to the first page.
    pub async fn change_size(&self, size: u32) -> bool {
        let size = size.max(1);
        let changed = self.inner.state.send_if_modified(|state| {
            if state.size == size && state.page == 0 {
                return false;
            }
            state.size = size;
            state.page = 0;
            true
        });
        self.after_move(changed).await
    }

    async fn move_to(&self, target: impl FnOnce(&PaginatedState<T>) -> Option<u32>) -> bool {
        let changed = self.inner.state.send_if_modified(|state| match target(state) {
            Some(page) => {
                state.page = page;
                true
            }
            None => false,
        });
        self.after_move(changed).await
    }

    async fn after_move(&self, changed: bool) -> bool {
        if changed && self.inner.options.immediate {
            if let Err(e) = self.fetch().await {
                tracing::debug!(error = %e, page = self.request().page, "page fetch failed");
            }
        }
        changed
    }
}
