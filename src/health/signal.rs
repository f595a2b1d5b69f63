//! Process-wide liveness and readiness flags.
//!
//! Liveness means "the process is running and not wedged"; readiness means
//! "the process can accept traffic". The two are independent: the process is
//! alive but not ready during startup, and during shutdown readiness is
//! cleared before liveness so the prober never sees a ready-but-dead process.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle to the process health flags.
///
/// Set by the orchestrator (true) and the shutdown coordinator (false), read
/// by the probe endpoints. Watch channels keep the flags cheap to read and
/// give tests a way to observe every transition.
#[derive(Debug, Clone)]
pub struct HealthSignal {
    inner: Arc<Flags>,
}

#[derive(Debug)]
struct Flags {
    live: watch::Sender<bool>,
    ready: watch::Sender<bool>,
}

impl HealthSignal {
    /// Create a new signal with both flags down.
    pub fn new() -> Self {
        let (live, _) = watch::channel(false);
        let (ready, _) = watch::channel(false);
        Self {
            inner: Arc::new(Flags { live, ready }),
        }
    }

    pub fn set_live(&self, value: bool) {
        if self.inner.live.send_replace(value) != value {
            tracing::debug!(live = value, "Liveness changed");
        }
    }

    pub fn set_ready(&self, value: bool) {
        if self.inner.ready.send_replace(value) != value {
            tracing::debug!(ready = value, "Readiness changed");
        }
    }

    pub fn is_live(&self) -> bool {
        *self.inner.live.borrow()
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    /// Subscribe to liveness transitions.
    pub fn subscribe_live(&self) -> watch::Receiver<bool> {
        self.inner.live.subscribe()
    }

    /// Subscribe to readiness transitions.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.inner.ready.subscribe()
    }
}

impl Default for HealthSignal {
    fn default() -> Self {
        Self::new()
    }
}
