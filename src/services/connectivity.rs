//! Internet reachability as a shared boolean stream.

use log::info;

use crate::core::{Observable, Subject};
use crate::core::stream::stream_error;

pub trait Connectivity: Send + Sync {
    /// Replays the current state to new subscribers, then every transition.
    fn internet_status(&self) -> Observable<bool>;
}

/// Connectivity source fed by whoever observes the network.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    status: Subject<bool>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        Self {
            status: Subject::replaying(online),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status.latest().unwrap_or(false)
    }

    /// Publish a new state. Repeats of the current state are dropped.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.status.next_if_changed(online);
        if changed {
            info!("Internet {}", if online { "available" } else { "unavailable" });
        }
        changed
    }

    /// Fail the stream, e.g. when the platform probe shuts down.
    pub fn fail(&self, reason: &str) {
        self.status.error(stream_error(reason));
    }
}

impl Connectivity for ConnectivityMonitor {
    fn internet_status(&self) -> Observable<bool> {
        self.status.as_observable()
    }
}
