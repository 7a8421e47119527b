//! Staged fluent binder for one binding.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::descriptors::{BindingDescriptor, CreationStrategy};
use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;
use crate::recipe::{ErasedImplementation, Implements};

/// Binder operations in their only legal order.
///
/// The ordinal of each variant is compared against the binder's minimum
/// allowed stage; an operation whose stage is below the minimum is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindStage {
    /// Nothing configured yet: every operation is reachable.
    All,
    /// Implementation selection (`to`).
    To,
    /// Creation strategy selection (`from_new`, `from_external_provider`).
    From,
    /// Lifetime selection (`as_single`, `as_transient`).
    Scope,
    /// Eager construction (`non_lazy`).
    NonLazy,
    /// Fully configured: no operation is reachable.
    Sealed,
}

/// Fluent handle over the descriptor of contract `C`.
///
/// Every operation consumes the binder and hands it back on success, so
/// calls chain with `?`:
///
/// ```rust
/// use ferrous_bind::{implements, Container, Constructor, Injectable, Recipe, Lifetime, Eagerness, key_of, DiResult};
///
/// trait Logger: Send + Sync {}
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {}
/// impl Injectable for ConsoleLogger {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(ConsoleLogger)).into()
///     }
/// }
/// implements!(ConsoleLogger => dyn Logger);
///
/// fn configure(container: &mut Container) -> DiResult<()> {
///     container
///         .bind::<dyn Logger>()?
///         .to::<ConsoleLogger>()?
///         .from_new()?
///         .as_single()?
///         .non_lazy()?;
///     Ok(())
/// }
///
/// let mut container = Container::new();
/// configure(&mut container).unwrap();
///
/// let descriptor = container.registry().lookup(&key_of::<dyn Logger>()).unwrap();
/// assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
/// assert_eq!(descriptor.eagerness(), Eagerness::Eager);
/// ```
pub struct Binder<'a, C: ?Sized> {
    descriptor: &'a mut BindingDescriptor,
    minimum: BindStage,
    _contract: PhantomData<fn() -> Arc<C>>,
}

impl<'a, C> Binder<'a, C>
where
    C: ?Sized + Send + Sync + 'static,
{
    pub(crate) fn new(descriptor: &'a mut BindingDescriptor) -> Self {
        Self {
            descriptor,
            minimum: BindStage::All,
            _contract: PhantomData,
        }
    }

    fn enter(&self, attempted: BindStage) -> DiResult<()> {
        if attempted < self.minimum {
            return Err(DiError::OrderingViolation {
                key: self.descriptor.contract(),
                attempted,
                allowed: self.minimum,
            });
        }
        trace!(contract = %self.descriptor.contract(), stage = ?attempted, "binding stage");
        Ok(())
    }

    /// Selects the implementation constructed for this contract.
    ///
    /// The implementation's recipe is captured now: its constructor plan,
    /// capability tags and kind. The default creation strategy follows the
    /// kind.
    pub fn to<I>(mut self) -> DiResult<Self>
    where
        I: Implements<C>,
    {
        self.enter(BindStage::To)?;
        self.descriptor.set_implementation(ErasedImplementation::of::<C, I>());
        self.minimum = BindStage::From;
        Ok(self)
    }

    /// Constructs instances with the implementation's designated constructor.
    pub fn from_new(self) -> DiResult<Self> {
        self.with_strategy(CreationStrategy::PlainConstruction)
    }

    /// Delegates creation to the container's external provider. Only valid
    /// for host-managed implementations.
    pub fn from_external_provider(self) -> DiResult<Self> {
        self.with_strategy(CreationStrategy::ExternalProvider)
    }

    fn with_strategy(mut self, strategy: CreationStrategy) -> DiResult<Self> {
        self.enter(BindStage::From)?;
        self.descriptor.set_strategy(strategy)?;
        self.minimum = BindStage::Scope;
        Ok(self)
    }

    /// One shared instance per container.
    pub fn as_single(self) -> DiResult<Self> {
        self.scope(Lifetime::Singleton)
    }

    /// A fresh instance per resolution.
    pub fn as_transient(self) -> DiResult<Self> {
        self.scope(Lifetime::Transient)
    }

    // The minimum stays at Scope: the lifetime can be re-set until non_lazy.
    fn scope(mut self, lifetime: Lifetime) -> DiResult<Self> {
        self.enter(BindStage::Scope)?;
        self.descriptor.set_lifetime(lifetime);
        self.minimum = BindStage::Scope;
        Ok(self)
    }

    /// Constructs the singleton during install instead of on first use.
    pub fn non_lazy(mut self) -> DiResult<Self> {
        self.enter(BindStage::NonLazy)?;
        self.descriptor.set_eager()?;
        self.minimum = BindStage::Sealed;
        Ok(self)
    }

    /// Earliest operation still reachable.
    pub fn stage(&self) -> BindStage {
        self.minimum
    }

    pub fn descriptor(&self) -> &BindingDescriptor {
        self.descriptor
    }
}
