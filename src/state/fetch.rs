//! Observable `{data, loading, error}` state around an async load.
//!
//! DESIGN
//! ======
//! A `Resource` owns a fetcher closure and a `watch` channel holding the
//! latest `FetchState`. Each invocation walks `Idle -> Loading -> Success |
//! Error` and re-enters `Loading` on every new call. Calls are not coalesced
//! or cancelled; instead every call takes a generation number and only the
//! most recently started call may write state or fire callbacks. A slow
//! response that resolves after a newer call started is dropped.

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;

use crate::net::error::ApiError;

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;
type SuccessHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&ApiError) + Send + Sync>;

// =============================================================================
// GENERATION
// =============================================================================

/// Monotonic invocation counter shared by `Resource` and `Paginated`.
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    /// Start a new invocation and return its ticket.
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self { data: None, loading: false, error: None }
    }
}

impl<T> FetchState<T> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.loading, &self.error, &self.data) {
            (true, _, _) => Phase::Loading,
            (false, Some(_), _) => Phase::Error,
            (false, None, Some(_)) => Phase::Success,
            (false, None, None) => Phase::Idle,
        }
    }
}

/// Callbacks and mount behaviour.
pub struct FetchOptions<T> {
    /// Run once from [`Resource::mount`].
    pub immediate: bool,
    pub on_success: Option<SuccessHook<T>>,
    pub on_error: Option<ErrorHook>,
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self { immediate: false, on_success: None, on_error: None }
    }
}

impl<T> Clone for FetchOptions<T> {
    fn clone(&self) -> Self {
        Self { immediate: self.immediate, on_success: self.on_success.clone(), on_error: self.on_error.clone() }
    }
}

impl<T> FetchOptions<T> {
    /// Options that fetch on mount.
    #[must_use]
    pub fn immediate() -> Self {
        Self { immediate: true, ..Self::default() }
    }

    #[must_use]
    pub fn on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }
}

// =============================================================================
// RESOURCE
// =============================================================================

/// A re-runnable load with observable state. Cheap to clone; clones share
/// state.
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    fetcher: Fetcher<T>,
    options: FetchOptions<T>,
    state: watch::Sender<FetchState<T>>,
    generation: Generation,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(fetcher: F, options: FetchOptions<T>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetcher: Fetcher<T> = Arc::new(move || fetcher().boxed());
        let (state, _) = watch::channel(FetchState::default());
        Self { inner: Arc::new(Inner { fetcher, options, state, generation: Generation::default() }) }
    }

    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    /// Run the fetcher if the options ask for an immediate load.
    pub async fn mount(&self) {
        if self.inner.options.immediate {
            if let Err(e) = self.execute().await {
                tracing::debug!(error = %e, "initial fetch failed");
            }
        }
    }

    /// Run the fetcher once.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error. The caller always gets its own outcome;
    /// only state and callbacks are skipped when a newer call has started.
    pub async fn execute(&self) -> Result<T, ApiError> {
        let fetch = (self.inner.fetcher)();
        self.run(fetch).await
    }

    /// Alias of [`Resource::execute`].
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error.
    pub async fn refetch(&self) -> Result<T, ApiError> {
        self.execute().await
    }

    /// Track an arbitrary future through this resource's state, as if it
    /// were a call of the fetcher.
    ///
    /// # Errors
    ///
    /// Returns the future's error.
    pub async fn run<Fut>(&self, fetch: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>> + Send,
    {
        let ticket = self.inner.generation.begin();
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = fetch.await;

        if !self.inner.generation.is_current(ticket) {
            tracing::debug!(ticket, "discarding stale fetch result");
            return result;
        }
        match &result {
            Ok(data) => {
                self.inner.state.send_replace(FetchState { data: Some(data.clone()), loading: false, error: None });
                if let Some(hook) = &self.inner.options.on_success {
                    hook(data);
                }
            }
            Err(e) => {
                self.inner.state.send_replace(FetchState { data: None, loading: false, error: Some(e.message.clone()) });
                if let Some(hook) = &self.inner.options.on_error {
                    hook(e);
                }
            }
        }
        result
    }
}
