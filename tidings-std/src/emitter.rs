//! One-to-many change notification.

use parking_lot::Mutex;
use std::sync::Arc;
use tidings_core::{BoxError, EmitError};

/// A subscribed callback.
///
/// Identity is pointer identity: keep the `Arc` around to unsubscribe it.
pub type ListenerFn<T> = Arc<dyn Fn(&T) -> Result<(), BoxError> + Send + Sync>;

/// Wrap an infallible closure as a listener.
pub fn listener<T, F>(f: F) -> ListenerFn<T>
where
    F: Fn(&T) + Send + Sync + 'static,
{
    Arc::new(move |event: &T| {
        f(event);
        Ok(())
    })
}

/// Wrap a fallible closure as a listener.
pub fn try_listener<T, F>(f: F) -> ListenerFn<T>
where
    F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What [`Emitter::emit`] does when a listener fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerPolicy {
    /// Stop at the first failure and report it; later listeners are skipped.
    #[default]
    Abort,
    /// Run every listener, log each failure, then report all of them.
    Isolate,
}

/// An ordered set of listeners invoked synchronously on [`emit`].
///
/// `emit` works on a snapshot of the listener list taken when it starts, so
/// a listener may add or remove listeners (itself included) while being
/// called. Such changes take effect from the next `emit`.
///
/// [`emit`]: Emitter::emit
pub struct Emitter<T> {
    listeners: Mutex<Vec<ListenerFn<T>>>,
    policy: ListenerPolicy,
}

impl<T> Emitter<T> {
    /// Create an emitter with no listeners and the [`ListenerPolicy::Abort`]
    /// policy.
    pub fn new() -> Self {
        Self::with_policy(ListenerPolicy::default())
    }

    /// Create an emitter with the given failure policy.
    pub fn with_policy(policy: ListenerPolicy) -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            policy,
        }
    }

    /// Add a listener. Returns `false` if it was already subscribed.
    pub fn add_listener(&self, listener: ListenerFn<T>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn remove_listener(&self, listener: &ListenerFn<T>) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the listener is subscribed.
    pub fn contains(&self, listener: &ListenerFn<T>) -> bool {
        self.listeners.lock().iter().any(|l| Arc::ptr_eq(l, listener))
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// The configured failure policy.
    pub fn policy(&self) -> ListenerPolicy {
        self.policy
    }

    /// Invoke every listener, in subscription order.
    pub fn emit(&self, event: &T) -> Result<(), EmitError> {
        let listeners = self.listeners.lock().clone();

        match self.policy {
            ListenerPolicy::Abort => {
                for listener in &listeners {
                    listener(event).map_err(EmitError::Listener)?;
                }
                Ok(())
            }
            ListenerPolicy::Isolate => {
                let total = listeners.len();
                let mut failures = Vec::new();
                for (index, listener) in listeners.iter().enumerate() {
                    if let Err(e) = listener(event) {
                        tracing::warn!(listener = index, error = %e, "Listener failed");
                        failures.push(e);
                    }
                }
                if failures.is_empty() {
                    Ok(())
                } else {
                    Err(EmitError::Isolated { failures, total })
                }
            }
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder(log: &Arc<Mutex<Vec<(usize, u32)>>>, id: usize) -> ListenerFn<u32> {
        let log = log.clone();
        listener(move |event: &u32| log.lock().push((id, *event)))
    }

    #[test]
    fn test_no_listeners_by_default() {
        let emitter = Emitter::<u32>::new();
        assert_eq!(emitter.listener_count(), 0);
        assert!(emitter.emit(&1).is_ok());
    }

    #[test]
    fn test_emit_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let emitter = Emitter::new();
        emitter.add_listener(recorder(&log, 1));
        emitter.add_listener(recorder(&log, 2));

        emitter.emit(&7).unwrap();

        assert_eq!(*log.lock(), vec![(1, 7), (2, 7)]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let emitter = Emitter::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let l = listener(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(emitter.add_listener(l.clone()));
        assert!(!emitter.add_listener(l.clone()));
        assert_eq!(emitter.listener_count(), 1);

        emitter.emit(&0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let emitter = Emitter::new();
        let first = recorder(&log, 1);
        emitter.add_listener(first.clone());
        emitter.add_listener(recorder(&log, 2));

        assert!(emitter.remove_listener(&first));
        assert!(!emitter.remove_listener(&first));
        assert!(!emitter.contains(&first));

        emitter.emit(&3).unwrap();
        assert_eq!(*log.lock(), vec![(2, 3)]);
    }

    #[test]
    fn test_abort_policy_skips_remaining() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let emitter = Emitter::new();
        emitter.add_listener(try_listener(|_: &u32| Err("first".into())));
        emitter.add_listener(recorder(&log, 2));

        let err = emitter.emit(&1).unwrap_err();
        assert!(matches!(err, EmitError::Listener(_)));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_isolate_policy_runs_everyone() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let emitter = Emitter::with_policy(ListenerPolicy::Isolate);
        emitter.add_listener(try_listener(|_: &u32| Err("first".into())));
        emitter.add_listener(recorder(&log, 2));
        emitter.add_listener(try_listener(|_: &u32| Err("third".into())));

        match emitter.emit(&1) {
            Err(EmitError::Isolated { failures, total }) => {
                assert_eq!(total, 3);
                let messages: Vec<_> = failures.iter().map(|e| e.to_string()).collect();
                assert_eq!(messages, vec!["first", "third"]);
            }
            other => panic!("expected isolated failures, got {other:?}"),
        }
        assert_eq!(*log.lock(), vec![(2, 1)]);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let emitter = Arc::new(Emitter::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<ListenerFn<u32>>>> = Arc::new(Mutex::new(None));
        let l = {
            let emitter = Arc::downgrade(&emitter);
            let calls = calls.clone();
            let slot = slot.clone();
            listener(move |_: &u32| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let (Some(emitter), Some(me)) = (emitter.upgrade(), slot.lock().take()) {
                    emitter.remove_listener(&me);
                }
            })
        };
        *slot.lock() = Some(l.clone());
        emitter.add_listener(l);

        emitter.emit(&1).unwrap();
        emitter.emit(&2).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count(), 0);
    }
}
