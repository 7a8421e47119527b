//! The container: binding registry, resolver state and install pipeline.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::binder::Binder;
use crate::config::ContainerConfig;
use crate::error::DiResult;
use crate::host::{ExternalProvider, HostHandle};
use crate::internal::{LifecycleQueues, ResolutionStack};
use crate::key::{key_of, Key};
use crate::observer::{DiObserver, Observers};
use crate::recipe::Injectable;
use crate::registration::{AnyArc, BindingRegistry};

mod context;
mod install;
mod resolve;

pub use context::ResolverContext;
pub use install::{InstallReport, InstallState};

/// Dependency injection container.
///
/// A container owns one [`BindingRegistry`], the singleton cache and the
/// lifecycle queues. It is built and driven from one thread: bindings are
/// registered, [`install`](Self::install) runs the installation pipeline, and
/// the owning scope forwards its start and teardown signals to
/// [`start`](Self::start) and [`teardown`](Self::teardown).
///
/// # Examples
///
/// ```
/// use ferrous_bind::{implements, Container, Constructor, Injectable, Recipe, Resolver, key_of};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, message: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, message: &str) {
///         println!("{message}");
///     }
/// }
/// impl Injectable for ConsoleLogger {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(ConsoleLogger)).into()
///     }
/// }
/// implements!(ConsoleLogger => dyn Logger);
///
/// struct Service {
///     logger: Arc<dyn Logger>,
/// }
/// impl Injectable for Service {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(logger,): (Arc<dyn Logger>,)| Ok(Service { logger })).into()
///     }
/// }
///
/// let mut container = Container::new();
/// container
///     .bind::<dyn Logger>().unwrap()
///     .to::<ConsoleLogger>().unwrap()
///     .as_single().unwrap()
///     .non_lazy().unwrap();
/// container.bind_self::<Service>().unwrap().as_transient().unwrap();
///
/// container.install(&[]).unwrap();
/// assert!(container.is_cached(&key_of::<dyn Logger>()));
///
/// let first = container.resolve::<Service>().unwrap();
/// let second = container.resolve::<Service>().unwrap();
/// assert!(!Arc::ptr_eq(&first, &second));
/// assert!(Arc::ptr_eq(&first.logger, &second.logger));
/// first.logger.log("ready");
/// ```
pub struct Container {
    registry: BindingRegistry,
    state: RefCell<ResolverState>,
    in_progress: RefCell<ResolutionStack>,
    install_state: InstallState,
    provider: Option<Arc<dyn ExternalProvider>>,
    observers: Observers,
    config: ContainerConfig,
}

/// Mutable resolver state. Never borrowed across a constructor call or a
/// nested resolution.
#[derive(Default)]
struct ResolverState {
    singletons: HashMap<Key, AnyArc>,
    queues: LifecycleQueues,
    /// Host objects created while the validation pass is running.
    hosted: Option<Vec<HostHandle>>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: BindingRegistry::new(),
            state: RefCell::new(ResolverState::default()),
            in_progress: RefCell::new(ResolutionStack::default()),
            install_state: InstallState::Uninstalled,
            provider: None,
            observers: Observers::default(),
            config,
        }
    }

    /// Attaches the host runtime used by bindings created
    /// `from_external_provider`.
    pub fn with_external_provider(mut self, provider: Arc<dyn ExternalProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Adds an observer notified around every resolution.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.add(observer);
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Registers an abstract contract; see [`BindingRegistry::bind`].
    pub fn bind<C>(&mut self) -> DiResult<Binder<'_, C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.registry.bind::<C>()
    }

    /// Registers a concrete type as its own implementation; see
    /// [`BindingRegistry::bind_self`].
    pub fn bind_self<T: Injectable>(&mut self) -> DiResult<Binder<'_, T>> {
        self.registry.bind_self::<T>()
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn install_state(&self) -> InstallState {
        self.install_state
    }

    /// True when the singleton cache holds an instance for `key`.
    pub fn is_cached(&self, key: &Key) -> bool {
        self.state.borrow().singletons.contains_key(key)
    }

    /// Typed form of [`is_cached`](Self::is_cached).
    pub fn has_cached_instance<C: ?Sized + 'static>(&self) -> bool {
        self.is_cached(&key_of::<C>())
    }

    /// Number of singleton instances currently cached.
    pub fn cached_count(&self) -> usize {
        self.state.borrow().singletons.len()
    }

    pub fn pending_initializables(&self) -> usize {
        self.state.borrow().queues.pending_initializables()
    }

    pub fn pending_disposables(&self) -> usize {
        self.state.borrow().queues.pending_disposables()
    }

    /// Start signal of the owning scope: initializes every queued instance in
    /// construction order, then forgets them. Returns how many ran.
    ///
    /// The queue is detached before the hooks run, so instances constructed
    /// by a hook wait for the next start signal.
    pub fn start(&self) -> usize {
        let queue = self.state.borrow_mut().queues.take_initializables();
        let count = LifecycleQueues::initialize_all(queue);
        debug!(count, "initialized queued instances");
        count
    }

    /// Teardown signal of the owning scope: disposes every queued instance in
    /// construction order, then forgets them. Returns how many ran.
    pub fn teardown(&self) -> usize {
        let queue = self.state.borrow_mut().queues.take_disposables();
        let count = LifecycleQueues::dispose_all(queue);
        debug!(count, "disposed queued instances");
        count
    }

    /// Human-readable dump of every binding and its policy.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str(&format!("State: {:?}\n", self.install_state));
        s.push_str("Bindings:\n");
        for descriptor in self.registry.descriptors() {
            let implementation = descriptor
                .implementation()
                .map(|k| k.display_name())
                .unwrap_or("<none>");
            s.push_str(&format!(
                "  {} -> {}: {:?} {:?} {:?}{}\n",
                descriptor.contract(),
                implementation,
                descriptor.strategy(),
                descriptor.lifetime(),
                descriptor.eagerness(),
                if self.is_cached(&descriptor.contract()) { " (cached)" } else { "" },
            ));
        }
        s.push_str(&format!(
            "Queues: {} initializable, {} disposable\n",
            self.pending_initializables(),
            self.pending_disposables()
        ));
        s
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        let pending = self.state.get_mut().queues.pending_disposables();
        if pending > 0 {
            warn!(pending, "container dropped with undisposed instances; call teardown() before dropping");
        }
    }
}
