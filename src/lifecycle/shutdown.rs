//! Shutdown coordination for the gateway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::health::HealthSignal;
use crate::lifecycle::registry::ResourceRegistry;

/// Single-fire wait/notify primitive for the blocked main routine.
///
/// States: waiting → signaled, one-way. Repeated signals are no-ops, and a
/// waiter that arrives after the signal fired observes it immediately.
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Fire the signal. Idempotent.
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_signaled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal fires. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close under us.
        let _ = rx.wait_for(|signaled| *signaled).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the shutdown sequence exactly once.
///
/// On trigger: readiness off → wake the blocked main routine → release all
/// registered resources in reverse order → liveness off. Everything after the
/// wakeup runs on the triggering task, so the woken main routine awaits
/// [`ShutdownCoordinator::wait_drained`] before letting the process exit.
pub struct ShutdownCoordinator {
    health: HealthSignal,
    registry: Arc<ResourceRegistry>,
    signal: Arc<ShutdownSignal>,
    triggered: AtomicBool,
    drained: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new(
        health: HealthSignal,
        registry: Arc<ResourceRegistry>,
        signal: Arc<ShutdownSignal>,
    ) -> Self {
        let (drained, _) = watch::channel(false);
        Self {
            health,
            registry,
            signal,
            triggered: AtomicBool::new(false),
            drained,
        }
    }

    /// Run the shutdown sequence. A concurrent or repeated trigger does not
    /// re-run any step; it waits for the first trigger to finish draining.
    pub async fn trigger(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            self.wait_drained().await;
            return;
        }

        tracing::info!("Shutdown start");
        self.health.set_ready(false);
        self.signal.signal();

        let failures = self.registry.release_all().await;
        if failures > 0 {
            tracing::warn!(failures, "Some resources failed to release");
        }

        self.health.set_live(false);
        self.drained.send_replace(true);
        tracing::info!("Shutdown end");
    }

    /// Wait until a trigger has finished releasing every resource.
    pub async fn wait_drained(&self) {
        let mut rx = self.drained.subscribe();
        let _ = rx.wait_for(|drained| *drained).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    fn coordinator_with_counter() -> (Arc<ShutdownCoordinator>, HealthSignal, Arc<AtomicU32>) {
        let health = HealthSignal::new();
        let registry = Arc::new(ResourceRegistry::new());
        let signal = Arc::new(ShutdownSignal::new());
        let releases = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&releases);
        registry.register("counting", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        health.set_live(true);
        health.set_ready(true);
        let coordinator = Arc::new(ShutdownCoordinator::new(
            health.clone(),
            registry,
            signal,
        ));
        (coordinator, health, releases)
    }

    #[tokio::test]
    async fn trigger_runs_full_sequence() {
        let (coordinator, health, releases) = coordinator_with_counter();

        coordinator.trigger().await;

        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(!health.is_ready());
        assert!(!health.is_live());
    }

    #[tokio::test]
    async fn double_trigger_releases_once() {
        let (coordinator, health, releases) = coordinator_with_counter();

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.trigger().await })
        };
        coordinator.trigger().await;
        first.await.unwrap();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(!health.is_ready());
        assert!(!health.is_live());
    }

    #[tokio::test]
    async fn readiness_clears_before_liveness() {
        let (coordinator, health, _) = coordinator_with_counter();
        let mut ready = health.subscribe_ready();

        coordinator.trigger().await;

        // The readiness transition must have happened while still live would
        // have been true; after the full sequence both are down.
        ready.changed().await.unwrap();
        assert!(!*ready.borrow());
        assert!(!health.is_live());
    }

    #[tokio::test]
    async fn signal_wakes_waiter_started_after_fire() {
        let signal = ShutdownSignal::new();
        signal.signal();
        signal.signal();

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("waiter must observe an already-fired signal");
        assert!(signal.is_signaled());
    }

    #[tokio::test]
    async fn signal_wakes_blocked_waiter() {
        let signal = Arc::new(ShutdownSignal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move { signal.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        signal.signal();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("blocked waiter must resume after the trigger")
            .unwrap();
    }
}
