// Webber: offline-first GET helper.
// Fetches text or JSON arrays from a configured server and caches them for offline use.

pub mod cache;
pub mod config;
pub mod error;
pub mod net;
pub mod webber;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheKind, FileStore, KeyValueStore, MemoryStore};
pub use config::WebberConfig;
pub use error::{Result, WebberError};
pub use net::{Fetcher, HttpFetcher, ManualReachability, Reachability, RouteProbe};
pub use webber::{AsyncOptions, Delivery, FinallyFn, Lookup, PendingFetch, Webber, WebberBuilder};
