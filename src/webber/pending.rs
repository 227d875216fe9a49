// Asynchronous retrieval.
// Splits an offline-first request into an immediate cached value and an awaitable network result.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::WebberError;
use crate::net::Reachability;

use super::{Lookup, Webber};

/// Completion callback run once after the network result is handled.
pub type FinallyFn = Box<dyn FnOnce() + Send + 'static>;

/// Flags for the asynchronous getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncOptions {
    /// Store fresh results, and fall back to the store while unreachable.
    pub cache: bool,
    /// Read the store up front so a cached value is available immediately.
    pub offline: bool,
}

impl Default for AsyncOptions {
    fn default() -> Self {
        Self {
            cache: true,
            offline: true,
        }
    }
}

impl AsyncOptions {
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// One delivery to a result callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// Read from the store before the network hop.
    Cached(Option<T>),
    /// Produced by the background fetch.
    Fresh(Option<T>),
}

impl<T> Delivery<T> {
    pub fn into_inner(self) -> Option<T> {
        match self {
            Delivery::Cached(value) | Delivery::Fresh(value) => value,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Delivery::Fresh(_))
    }
}

/// A request whose network half runs on a blocking worker.
///
/// Dropping it does not cancel the fetch; the worker still runs to completion
/// and still writes the cache.
pub struct PendingFetch<T> {
    cached: Option<T>,
    task: JoinHandle<Lookup<T>>,
    reachability: Arc<dyn Reachability>,
}

impl<T: Send + 'static> PendingFetch<T> {
    fn spawn(
        webber: &Webber,
        cached: Option<T>,
        fetch: impl FnOnce(Webber) -> Lookup<T> + Send + 'static,
    ) -> Self {
        let worker = webber.clone();
        Self {
            cached,
            task: tokio::task::spawn_blocking(move || fetch(worker)),
            reachability: Arc::clone(&webber.reachability),
        }
    }

    /// Value read from the store when the request started. Always `None`
    /// unless the request was made with `offline` set.
    pub fn cached(&self) -> Option<&T> {
        self.cached.as_ref()
    }

    pub fn take_cached(&mut self) -> Option<T> {
        self.cached.take()
    }

    /// Wait for the fetch. Returns `None` when the device is unreachable at
    /// completion, in which case the result is not delivered.
    pub async fn fresh_lookup(self) -> Option<Lookup<T>> {
        let lookup = match self.task.await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(error = %e, "Background fetch did not complete");
                Lookup::Failed(WebberError::Other(format!("background fetch failed: {}", e)))
            }
        };

        if self.reachability.is_reachable() {
            Some(lookup)
        } else {
            debug!("Unreachable after fetch, dropping result");
            None
        }
    }

    /// Fresh value, or `None` when unreachable at completion or on any error.
    pub async fn fresh(self) -> Option<T> {
        self.fresh_lookup().await.and_then(Lookup::into_option)
    }

    /// Drive the callback contract: an immediate `Cached` delivery when
    /// `offline` is set, then a `Fresh` delivery if reachable at completion,
    /// then `on_finally` exactly once. The returned handle resolves after
    /// `on_finally` has run.
    fn deliver<F>(
        mut self,
        offline: bool,
        mut on_result: F,
        on_finally: Option<FinallyFn>,
    ) -> JoinHandle<()>
    where
        F: FnMut(Delivery<T>) + Send + 'static,
    {
        if offline {
            on_result(Delivery::Cached(self.take_cached()));
        }

        tokio::spawn(async move {
            if let Some(lookup) = self.fresh_lookup().await {
                on_result(Delivery::Fresh(lookup.into_option()));
            }
            if let Some(on_finally) = on_finally {
                on_finally();
            }
        })
    }
}

impl Webber {
    /// Start an offline-first text request. Must be called inside a Tokio runtime.
    pub fn async_get_from_api(&self, path: &str, options: AsyncOptions) -> PendingFetch<String> {
        let cached = if options.offline {
            self.cache_get_from_api(path)
        } else {
            None
        };

        let path = path.to_string();
        PendingFetch::spawn(self, cached, move |webber| {
            webber.fetch_text(&path, options.cache)
        })
    }

    /// Start an offline-first JSON array request. Must be called inside a Tokio runtime.
    pub fn async_get_json_array_from_api(
        &self,
        path: &str,
        options: AsyncOptions,
    ) -> PendingFetch<Vec<Value>> {
        let cached = if options.offline {
            self.cache_get_json_array_from_api(path)
        } else {
            None
        };

        let path = path.to_string();
        PendingFetch::spawn(self, cached, move |webber| {
            webber.fetch_json_array(&path, options.cache)
        })
    }

    /// Callback form of [`Webber::async_get_from_api`].
    ///
    /// `on_result` runs zero, one, or two times. The `Cached` delivery happens
    /// before this returns; the `Fresh` one and `on_finally` run on the
    /// current runtime once the fetch finishes.
    pub fn async_get_from_api_with<F>(
        &self,
        path: &str,
        options: AsyncOptions,
        on_result: F,
        on_finally: Option<FinallyFn>,
    ) -> JoinHandle<()>
    where
        F: FnMut(Delivery<String>) + Send + 'static,
    {
        self.async_get_from_api(path, options)
            .deliver(options.offline, on_result, on_finally)
    }

    /// Callback form of [`Webber::async_get_json_array_from_api`].
    pub fn async_get_json_array_from_api_with<F>(
        &self,
        path: &str,
        options: AsyncOptions,
        on_result: F,
        on_finally: Option<FinallyFn>,
    ) -> JoinHandle<()>
    where
        F: FnMut(Delivery<Vec<Value>>) + Send + 'static,
    {
        self.async_get_json_array_from_api(path, options)
            .deliver(options.offline, on_result, on_finally)
    }
}
