//! Resolver traits for binding resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of, Key};
use crate::registration::AnyArc;

/// Core resolver trait for object-safe resolution.
///
/// Implemented by [`Container`](crate::Container) and by the
/// [`ResolverContext`](crate::ResolverContext) handed to constructors. Most
/// users should use the [`Resolver`] trait instead, which adds typed methods
/// on top of this one.
pub trait ResolverCore {
    /// Resolves one binding by key.
    ///
    /// Returns the contract instance type-erased as `Arc<dyn Any>` wrapping
    /// an `Arc<C>`.
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// # Examples
///
/// ```
/// use ferrous_bind::{implements, Container, Constructor, Injectable, Recipe, Resolver};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
/// impl Injectable for FixedClock {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(FixedClock)).into()
///     }
/// }
/// implements!(FixedClock => dyn Clock);
///
/// let mut container = Container::new();
/// container.bind::<dyn Clock>().unwrap().to::<FixedClock>().unwrap();
///
/// let clock: Arc<dyn Clock> = container.resolve::<dyn Clock>().unwrap();
/// assert_eq!(clock.now(), 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves contract `C`, which may be a concrete type or a trait object.
    fn resolve<C>(&self) -> DiResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let key = key_of::<C>();
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<C>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(key.display_name()))
    }

    /// Resolves contract `C`, returning `None` when it is not bound.
    ///
    /// Only the absence of `C` itself maps to `None`; a missing dependency of
    /// `C` is still an error.
    fn try_resolve<C>(&self) -> DiResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match self.resolve::<C>() {
            Ok(instance) => Ok(Some(instance)),
            Err(DiError::NotRegistered(key)) if key == key_of::<C>() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves contract `C`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if `C` cannot be resolved (not bound, construction failure,
    /// circular dependency, etc.).
    fn resolve_required<C>(&self) -> Arc<C>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<C>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<C>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
