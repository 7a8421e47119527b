//! Diagnostic observers for resolution traceability.
//!
//! Observers are notified around every resolution the container performs,
//! including nested resolutions of constructor parameters and the
//! install-time validation pass.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_bind::{Container, Constructor, DiError, DiObserver, Injectable, Key, Recipe, Resolver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counter {
///     resolved: AtomicUsize,
/// }
///
/// impl DiObserver for Counter {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Clock)).into()
///     }
/// }
///
/// let counter = Arc::new(Counter::default());
/// let mut container = Container::new();
/// container.add_observer(counter.clone());
/// container.bind_self::<Clock>().unwrap();
///
/// container.resolve::<Clock>().unwrap();
/// assert_eq!(counter.resolved.load(Ordering::SeqCst), 1);
/// ```
pub trait DiObserver {
    /// Called before a binding is looked up.
    fn resolving(&self, key: &Key);

    /// Called when a binding resolved, with the time spent including
    /// nested resolutions.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a resolution failed. Nested failures are reported once
    /// per enclosing resolution.
    fn failed(&self, key: &Key, error: &DiError);
}

/// Collection of observers attached to a container.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolutions are emitted at `TRACE`, failures at `DEBUG` so that a failure
/// bubbling through several frames does not flood higher levels; the caller
/// decides how to report the final error.
///
/// ```
/// use ferrous_bind::{Container, TracingObserver};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    label: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every event with `label`, to tell several containers apart.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()) }
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("container")
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        trace!(container = self.label(), contract = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        trace!(
            container = self.label(),
            contract = %key,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        debug!(container = self.label(), contract = %key, error = %error, "resolution failed");
    }
}
