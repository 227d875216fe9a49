// Network module.
// Provides the GET fetcher and the reachability probe consulted before each request.

pub mod fetch;
pub mod reachability;

pub use fetch::{Fetcher, HttpFetcher, request_url};
pub use reachability::{ManualReachability, Reachability, RouteProbe};
