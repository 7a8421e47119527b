//! Binding descriptors: the resolution policy recorded for one contract.

use std::fmt;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::{Eagerness, Lifetime};
use crate::recipe::ErasedImplementation;

/// How instances of a binding are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub enum CreationStrategy {
    /// Invoke the implementation's designated constructor.
    PlainConstruction,
    /// Ask the container's external provider to create a host-managed instance.
    ExternalProvider,
}

/// Whether an implementation is a plain type or owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub enum ImplementationKind {
    Plain,
    HostManaged,
}

impl ImplementationKind {
    /// The only creation strategy this kind of implementation accepts.
    pub fn strategy(self) -> CreationStrategy {
        match self {
            ImplementationKind::Plain => CreationStrategy::PlainConstruction,
            ImplementationKind::HostManaged => CreationStrategy::ExternalProvider,
        }
    }
}

/// Binding descriptor for introspection and resolution
///
/// A descriptor is created by `bind`, mutated only through its
/// [`Binder`](crate::Binder) while installers run, and read-only afterwards.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{Container, Constructor, Injectable, Recipe, Lifetime, Eagerness, CreationStrategy, key_of};
///
/// struct Repository;
/// impl Injectable for Repository {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Repository)).into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_self::<Repository>().unwrap().as_single().unwrap();
///
/// let descriptor = container.registry().lookup(&key_of::<Repository>()).unwrap();
/// assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
/// assert_eq!(descriptor.eagerness(), Eagerness::Lazy);
/// assert_eq!(descriptor.strategy(), Some(CreationStrategy::PlainConstruction));
/// assert!(descriptor.constructor_plan().is_empty());
/// ```
pub struct BindingDescriptor {
    contract: Key,
    implementation: Option<ErasedImplementation>,
    strategy: Option<CreationStrategy>,
    lifetime: Lifetime,
    eagerness: Eagerness,
}

impl BindingDescriptor {
    /// Default policy: no implementation yet, transient, lazy.
    pub(crate) fn new(contract: Key) -> Self {
        Self {
            contract,
            implementation: None,
            strategy: None,
            lifetime: Lifetime::Transient,
            eagerness: Eagerness::Lazy,
        }
    }

    /// Key of the abstraction being satisfied.
    pub fn contract(&self) -> Key {
        self.contract
    }

    /// Key of the concrete type that will be constructed, once selected.
    pub fn implementation(&self) -> Option<Key> {
        self.implementation.as_ref().map(|imp| imp.key)
    }

    /// Kind of the selected implementation.
    pub fn implementation_kind(&self) -> Option<ImplementationKind> {
        self.implementation.as_ref().map(|imp| imp.kind())
    }

    pub fn strategy(&self) -> Option<CreationStrategy> {
        self.strategy
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn eagerness(&self) -> Eagerness {
        self.eagerness
    }

    pub fn is_initializable(&self) -> bool {
        self.implementation.as_ref().is_some_and(|imp| imp.initializable)
    }

    pub fn is_disposable(&self) -> bool {
        self.implementation.as_ref().is_some_and(|imp| imp.disposable)
    }

    /// Ordered parameter keys of the designated constructor.
    ///
    /// Empty for host-managed implementations, whose dependencies are listed
    /// per injection method in [`injection_plan`](Self::injection_plan).
    pub fn constructor_plan(&self) -> &[Key] {
        self.implementation
            .as_ref()
            .map(|imp| imp.constructor_plan())
            .unwrap_or(&[])
    }

    /// Injection methods of a host-managed implementation with their parameter keys.
    pub fn injection_plan(&self) -> Vec<(&'static str, &[Key])> {
        self.implementation
            .as_ref()
            .map(|imp| imp.injection_plan())
            .unwrap_or_default()
    }

    pub(crate) fn erased(&self) -> Option<&ErasedImplementation> {
        self.implementation.as_ref()
    }

    // ----- Staged setters, driven by the binder -----

    /// Selects the implementation; the default strategy follows its kind.
    pub(crate) fn set_implementation(&mut self, implementation: ErasedImplementation) {
        self.strategy = Some(implementation.kind().strategy());
        self.implementation = Some(implementation);
    }

    pub(crate) fn set_strategy(&mut self, strategy: CreationStrategy) -> DiResult<()> {
        let kind = self
            .implementation_kind()
            .ok_or(DiError::MissingImplementation(self.contract))?;
        if kind.strategy() != strategy {
            return Err(DiError::StrategyMismatch {
                key: self.contract,
                strategy,
                kind,
            });
        }
        self.strategy = Some(strategy);
        Ok(())
    }

    pub(crate) fn set_lifetime(&mut self, lifetime: Lifetime) {
        self.lifetime = lifetime;
    }

    pub(crate) fn set_eager(&mut self) -> DiResult<()> {
        if self.lifetime != Lifetime::Singleton {
            return Err(DiError::EagerTransient(self.contract));
        }
        self.eagerness = Eagerness::Eager;
        Ok(())
    }
}

impl fmt::Debug for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingDescriptor")
            .field("contract", &self.contract.display_name())
            .field("implementation", &self.implementation().map(|k| k.display_name()))
            .field("strategy", &self.strategy)
            .field("lifetime", &self.lifetime)
            .field("eagerness", &self.eagerness)
            .field("initializable", &self.is_initializable())
            .field("disposable", &self.is_disposable())
            .finish()
    }
}
