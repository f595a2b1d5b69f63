//! Ordered registry of closeable resources.
//!
//! Every dependency the orchestrator constructs registers a release action
//! here the moment it exists, so a failure later in startup still tears down
//! everything built so far. Release runs in strict reverse acquisition order.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Boxed error for release actions; failures are logged, never propagated.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type ReleaseFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>>;
type ReleaseFn = Box<dyn FnOnce() -> ReleaseFuture + Send>;

/// A registered resource: a name for logging plus a one-shot release action.
struct ResourceHandle {
    name: String,
    release: ReleaseFn,
}

/// Ordered collection of resources, released newest-first.
pub struct ResourceRegistry {
    handles: Mutex<Vec<ResourceHandle>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Append a release action. Insertion order is acquisition order.
    pub fn register<F, Fut>(&self, name: impl Into<String>, release: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let handle = ResourceHandle {
            name: name.into(),
            release: Box::new(move || Box::pin(release())),
        };
        self.lock().push(handle);
    }

    /// Number of resources currently registered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Release every registered resource in reverse acquisition order.
    ///
    /// A failing release is logged and does not stop the remaining releases.
    /// The sequence is drained up front, so a second call is a no-op.
    /// Returns the number of failed releases.
    pub async fn release_all(&self) -> usize {
        let drained: Vec<ResourceHandle> = {
            let mut handles = self.lock();
            handles.drain(..).collect()
        };

        let mut failures = 0;
        for handle in drained.into_iter().rev() {
            tracing::debug!(resource = %handle.name, "Releasing resource");
            if let Err(error) = (handle.release)().await {
                failures += 1;
                crate::observability::metrics::record_release_failure(&handle.name);
                tracing::error!(
                    resource = %handle.name,
                    error = %error,
                    "Failed to release resource"
                );
            }
        }
        failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ResourceHandle>> {
        // A poisoned lock must not block registration or teardown.
        match self.handles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording(
        registry: &ResourceRegistry,
        order: &Arc<Mutex<Vec<u32>>>,
        id: u32,
        fail: bool,
    ) {
        let order = Arc::clone(order);
        registry.register(format!("resource-{id}"), move || async move {
            order.lock().unwrap().push(id);
            if fail {
                Err::<(), BoxError>(format!("resource {id} refused to close").into())
            } else {
                Ok(())
            }
        });
    }

    #[tokio::test]
    async fn releases_in_reverse_acquisition_order() {
        let registry = ResourceRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 1..=4 {
            recording(&registry, &order, id, false);
        }

        let failures = registry.release_all().await;

        assert_eq!(failures, 0);
        assert_eq!(*order.lock().unwrap(), vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn failing_release_does_not_stop_the_rest() {
        let registry = ResourceRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        recording(&registry, &order, 1, false);
        recording(&registry, &order, 2, true);
        recording(&registry, &order, 3, false);

        let failures = registry.release_all().await;

        assert_eq!(failures, 1);
        assert_eq!(*order.lock().unwrap(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn second_release_is_noop() {
        let registry = ResourceRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        recording(&registry, &order, 1, false);

        registry.release_all().await;
        registry.release_all().await;

        assert_eq!(*order.lock().unwrap(), vec![1]);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn registration_is_safe_across_tasks() {
        let registry = Arc::new(ResourceRegistry::new());
        let mut joins = Vec::new();
        for id in 0..16u32 {
            let registry = Arc::clone(&registry);
            joins.push(tokio::spawn(async move {
                registry.register(format!("r{id}"), move || async move { Ok(()) });
            }));
        }
        for join in joins {
            join.await.unwrap();
        }
        assert_eq!(registry.len(), 16);
    }
}
