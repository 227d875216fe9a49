// Reachability probes.
// Reports whether a default network route is usable, never whether a given server answers.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Answers whether the device currently has a usable network path.
pub trait Reachability: Send + Sync {
    fn is_reachable(&self) -> bool;
}

/// Asks the OS for a route to a public address.
///
/// Connecting a UDP socket only selects a route; no packet leaves the host.
/// Any failure along the way reports unreachable.
#[derive(Debug, Clone, Copy)]
pub struct RouteProbe {
    target: SocketAddr,
}

impl RouteProbe {
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }
}

impl Default for RouteProbe {
    fn default() -> Self {
        Self::new(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53)))
    }
}

impl Reachability for RouteProbe {
    fn is_reachable(&self) -> bool {
        let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
            Ok(socket) => socket,
            Err(e) => {
                debug!(error = %e, "Reachability probe could not bind");
                return false;
            }
        };

        match socket.connect(self.target) {
            Ok(()) => true,
            Err(e) => {
                debug!(target = %self.target, error = %e, "No route");
                false
            }
        }
    }
}

/// Reachability switch set by the embedding application.
#[derive(Debug)]
pub struct ManualReachability {
    online: AtomicBool,
}

impl ManualReachability {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Reachability for ManualReachability {
    fn is_reachable(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
