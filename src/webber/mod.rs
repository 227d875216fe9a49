// Webber client.
// Offline-first GET retrieval: fetch and cache while reachable, serve the cache otherwise.

pub mod lookup;
pub mod pending;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKind, FileStore, KeyValueStore, MemoryStore, cache_key};
use crate::config::WebberConfig;
use crate::net::{Fetcher, HttpFetcher, Reachability, RouteProbe};

pub use lookup::{Lookup, decode_array};
pub use pending::{AsyncOptions, Delivery, FinallyFn, PendingFetch};

/// Client bound to one server address.
///
/// Clones share the same store, fetcher, and reachability probe.
#[derive(Clone)]
pub struct Webber {
    server: String,
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn Fetcher>,
    reachability: Arc<dyn Reachability>,
}

impl fmt::Debug for Webber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webber")
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

impl Webber {
    /// Start building a client for `server`, e.g. `https://api.example.com`.
    pub fn builder(server: impl Into<String>) -> WebberBuilder {
        WebberBuilder::new(server)
    }

    /// Client with a persistent file store, HTTP fetcher, and route probe.
    pub fn from_config(config: &WebberConfig) -> Self {
        let mut fetcher = HttpFetcher::new();
        if let Some(timeout) = config.timeout {
            fetcher = fetcher.with_timeout(timeout);
        }

        Self::builder(&config.server)
            .store(FileStore::open(&config.store_path))
            .fetcher(fetcher)
            .reachability(RouteProbe::default())
            .build()
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Same collaborators, different server. Cache entries are per server.
    pub fn with_server(&self, server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..self.clone()
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.reachability.is_reachable()
    }

    /// Store key used for `path` under this client's server.
    pub fn cache_key(&self, kind: CacheKind, path: &str) -> String {
        cache_key(kind, &self.server, path)
    }

    /// Retrieve raw text for `path`, reporting where it came from.
    ///
    /// While reachable this always fetches and, with `cache`, stores the
    /// result. While unreachable it reads the store only when `cache` is set.
    pub fn fetch_text(&self, path: &str, cache: bool) -> Lookup<String> {
        self.lookup(CacheKind::Text, path, cache)
    }

    /// Raw text for `path`, or `None` when offline without cache or on any error.
    pub fn get_from_api(&self, path: &str, cache: bool) -> Option<String> {
        self.fetch_text(path, cache).into_option()
    }

    /// Raw text previously cached for `path`. Never touches the network.
    pub fn cache_get_from_api(&self, path: &str) -> Option<String> {
        self.read_cache(CacheKind::Text, path).into_option()
    }

    /// Retrieve `path` and decode it as a JSON array.
    ///
    /// The raw text is cached before decoding, so a body that is not an array
    /// is still stored and fails again on every later cache read.
    pub fn fetch_json_array(&self, path: &str, cache: bool) -> Lookup<Vec<Value>> {
        let lookup = self.lookup(CacheKind::JsonArray, path, cache);
        self.decode(path, lookup)
    }

    pub fn get_json_array_from_api(&self, path: &str, cache: bool) -> Option<Vec<Value>> {
        self.fetch_json_array(path, cache).into_option()
    }

    /// Cached JSON array for `path`. Never touches the network.
    pub fn cache_get_json_array_from_api(&self, path: &str) -> Option<Vec<Value>> {
        let lookup = self.read_cache(CacheKind::JsonArray, path);
        self.decode(path, lookup).into_option()
    }

    fn lookup(&self, kind: CacheKind, path: &str, cache: bool) -> Lookup<String> {
        if !self.reachability.is_reachable() {
            return if cache {
                self.read_cache(kind, path)
            } else {
                Lookup::CacheMiss
            };
        }

        match self.fetcher.fetch_text(&self.server, path) {
            Ok(text) => {
                if cache {
                    self.write_cache(kind, path, &text);
                }
                Lookup::Fresh(text)
            }
            Err(e) => {
                warn!(server = %self.server, path, error = %e, "Fetch failed");
                Lookup::Failed(e)
            }
        }
    }

    fn read_cache(&self, kind: CacheKind, path: &str) -> Lookup<String> {
        match self.store.get(&self.cache_key(kind, path)) {
            Some(text) => {
                debug!(%kind, path, "Serving cached response");
                Lookup::Cached(text)
            }
            None => Lookup::CacheMiss,
        }
    }

    fn write_cache(&self, kind: CacheKind, path: &str, text: &str) {
        let key = self.cache_key(kind, path);
        match self.store.set(&key, text) {
            Ok(()) => debug!(%kind, path, bytes = text.len(), "Cached response"),
            // The fetched value is still returned
            Err(e) => warn!(key = %key, error = %e, "Failed to write offline cache"),
        }
    }

    fn decode(&self, path: &str, lookup: Lookup<String>) -> Lookup<Vec<Value>> {
        let decoded = lookup.try_map(|text| decode_array(&text));
        if let Some(e) = decoded.error().filter(|e| e.is_decode()) {
            warn!(server = %self.server, path, error = %e, "Response is not a JSON array");
        }
        decoded
    }
}

/// Wires collaborators into a [`Webber`]. Unset parts fall back to an
/// in-memory store, the HTTP fetcher, and the route probe.
pub struct WebberBuilder {
    server: String,
    store: Option<Arc<dyn KeyValueStore>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    reachability: Option<Arc<dyn Reachability>>,
}

impl WebberBuilder {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            store: None,
            fetcher: None,
            reachability: None,
        }
    }

    pub fn store(self, store: impl KeyValueStore + 'static) -> Self {
        self.shared_store(Arc::new(store))
    }

    pub fn shared_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn fetcher(self, fetcher: impl Fetcher + 'static) -> Self {
        self.shared_fetcher(Arc::new(fetcher))
    }

    pub fn shared_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn reachability(self, reachability: impl Reachability + 'static) -> Self {
        self.shared_reachability(Arc::new(reachability))
    }

    pub fn shared_reachability(mut self, reachability: Arc<dyn Reachability>) -> Self {
        self.reachability = Some(reachability);
        self
    }

    pub fn build(self) -> Webber {
        Webber {
            server: self.server,
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            fetcher: self.fetcher.unwrap_or_else(|| Arc::new(HttpFetcher::new())),
            reachability: self
                .reachability
                .unwrap_or_else(|| Arc::new(RouteProbe::default())),
        }
    }
}
