//! External provider seam for host-managed implementations.
//!
//! Some implementations cannot be built by a plain constructor: their storage
//! is owned by a host runtime (a scene graph, a plugin host, a GUI toolkit)
//! which creates them as children of the owning scope and destroys them on its
//! own schedule. The container reaches such hosts only through
//! [`ExternalProvider`], and instances it creates this way never enter the
//! container's initialize or dispose queues.

use crate::error::BoxError;
use crate::key::Key;

/// Opaque handle to a host-side object created by an [`ExternalProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(u64);

impl HostHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Host runtime that owns host-managed instances.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{
///     BoxError, Container, ExternalProvider, HostHandle, HostedRecipe, Injectable, Key, Recipe,
///     Resolver,
/// };
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Scene {
///     next: AtomicU64,
/// }
///
/// impl ExternalProvider for Scene {
///     fn create_child(&self, _implementation: Key) -> Result<HostHandle, BoxError> {
///         Ok(HostHandle::new(self.next.fetch_add(1, Ordering::SeqCst)))
///     }
///
///     fn destroy(&self, _handle: HostHandle) {}
/// }
///
/// struct Sprite {
///     handle: HostHandle,
/// }
///
/// impl Injectable for Sprite {
///     fn recipe() -> Recipe<Self> {
///         HostedRecipe::new(|handle| Ok(Sprite { handle })).into()
///     }
/// }
///
/// let mut container = Container::new().with_external_provider(Arc::new(Scene::default()));
/// container.bind_self::<Sprite>().unwrap().from_external_provider().unwrap();
///
/// let sprite = container.resolve::<Sprite>().unwrap();
/// assert_eq!(sprite.handle.raw(), 0);
/// ```
pub trait ExternalProvider {
    /// Creates the host object backing one instance of `implementation`, as a
    /// child of the owning scope.
    fn create_child(&self, implementation: Key) -> Result<HostHandle, BoxError>;

    /// Destroys a host object created by [`create_child`](Self::create_child).
    fn destroy(&self, handle: HostHandle);
}
