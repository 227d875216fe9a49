// Test doubles shared by unit tests.
// A scripted fetcher and a helper wiring it into a client with a manual probe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::MemoryStore;
use crate::error::{Result, WebberError};
use crate::net::{Fetcher, ManualReachability};
use crate::webber::Webber;

pub const SERVER: &str = "http://api.test";

/// Fetcher answering from a fixed table keyed by path; unknown paths fail with 404.
#[derive(Default)]
pub struct StubFetcher {
    responses: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), body.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for StubFetcher {
    fn fetch_text(&self, server: &str, path: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| WebberError::Status {
                status: 404,
                url: format!("{}/{}", server, path),
            })
    }
}

/// Handles to every collaborator of a test client.
pub struct Harness {
    pub webber: Webber,
    pub fetcher: Arc<StubFetcher>,
    pub probe: Arc<ManualReachability>,
    pub store: Arc<MemoryStore>,
}

pub fn harness(online: bool) -> Harness {
    let fetcher = Arc::new(StubFetcher::new());
    let probe = Arc::new(ManualReachability::new(online));
    let store = Arc::new(MemoryStore::new());

    let webber = Webber::builder(SERVER)
        .shared_fetcher(fetcher.clone())
        .shared_reachability(probe.clone())
        .shared_store(store.clone())
        .build();

    Harness {
        webber,
        fetcher,
        probe,
        store,
    }
}
