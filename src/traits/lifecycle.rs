//! Lifecycle capabilities flushed by the owning scope's signals.

/// Post-construction initialization hook.
///
/// Instances of implementations tagged with
/// [`Constructor::initializable`](crate::Constructor::initializable) are queued
/// as they are constructed and initialized, in construction order, when the
/// container receives the start signal.
///
/// # Examples
///
/// ```
/// use ferrous_bind::{Container, Constructor, Initializable, Injectable, Recipe, Resolver};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Cache {
///     warm: AtomicBool,
/// }
///
/// impl Initializable for Cache {
///     fn initialize(&self) {
///         self.warm.store(true, Ordering::SeqCst);
///     }
/// }
///
/// impl Injectable for Cache {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Cache { warm: AtomicBool::new(false) }))
///             .initializable()
///             .into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_self::<Cache>().unwrap().as_single().unwrap();
///
/// let cache = container.resolve::<Cache>().unwrap();
/// assert!(!cache.warm.load(Ordering::SeqCst));
///
/// assert_eq!(container.start(), 1);
/// assert!(cache.warm.load(Ordering::SeqCst));
/// ```
pub trait Initializable: Send + Sync + 'static {
    fn initialize(&self);
}

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g., flushing caches,
/// closing connections). Disposal hooks run in construction order when the
/// container receives the teardown signal.
///
/// # Examples
///
/// ```
/// use ferrous_bind::{Container, Constructor, Dispose, Injectable, Recipe, Resolver};
///
/// struct Connection;
///
/// impl Dispose for Connection {
///     fn dispose(&self) {
///         println!("closing connection");
///     }
/// }
///
/// impl Injectable for Connection {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Connection)).disposable().into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_self::<Connection>().unwrap();
///
/// container.resolve::<Connection>().unwrap();
/// container.resolve::<Connection>().unwrap();
/// assert_eq!(container.teardown(), 2);
/// assert_eq!(container.teardown(), 0);
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
