//! Binding registry: one descriptor per contract key.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::binder::Binder;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::{key_of, Key};
use crate::recipe::{ErasedImplementation, Injectable};

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Registry of binding descriptors for one container.
///
/// Append-only while installers run, frozen once installation has finished
/// its registration phase. Descriptors keep their registration order, which
/// is also the order of the validation pass and of eager construction.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    descriptors: Vec<BindingDescriptor>,
    index: HashMap<Key, usize>,
    frozen: bool,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an abstract contract. The returned binder must select an
    /// implementation with [`Binder::to`] before installation.
    ///
    /// Fails with `DuplicateRegistration` if `C` is already bound, leaving the
    /// first registration untouched, and with `RegistryFrozen` after install.
    pub fn bind<C>(&mut self) -> DiResult<Binder<'_, C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let descriptor = self.insert(key_of::<C>())?;
        Ok(Binder::new(descriptor))
    }

    /// Registers a concrete type as its own implementation: constructed with
    /// its own recipe, transient and lazy unless the binder says otherwise.
    pub fn bind_self<T: Injectable>(&mut self) -> DiResult<Binder<'_, T>> {
        let descriptor = self.insert(key_of::<T>())?;
        descriptor.set_implementation(ErasedImplementation::of::<T, T>());
        Ok(Binder::new(descriptor))
    }

    fn insert(&mut self, contract: Key) -> DiResult<&mut BindingDescriptor> {
        if self.frozen {
            return Err(DiError::RegistryFrozen(contract));
        }
        if self.index.contains_key(&contract) {
            return Err(DiError::DuplicateRegistration(contract));
        }

        let position = self.descriptors.len();
        self.descriptors.push(BindingDescriptor::new(contract));
        self.index.insert(contract, position);
        debug!(contract = %contract, "binding registered");
        Ok(&mut self.descriptors[position])
    }

    /// Returns the descriptor bound to `key`.
    pub fn lookup(&self, key: &Key) -> DiResult<&BindingDescriptor> {
        self.get(key).ok_or(DiError::NotRegistered(*key))
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&BindingDescriptor> {
        self.index.get(key).map(|&position| &self.descriptors[position])
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> &[BindingDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::Lifetime;
    use crate::recipe::{Constructor, Recipe};

    struct Repository;

    impl Injectable for Repository {
        fn recipe() -> Recipe<Self> {
            Constructor::new(|(): ()| Ok(Repository)).into()
        }
    }

    trait Store: Send + Sync {}

    #[test]
    fn test_duplicate_keeps_first_registration() {
        let mut registry = BindingRegistry::new();
        registry.bind_self::<Repository>().unwrap().as_single().unwrap();

        let err = registry.bind_self::<Repository>().err().unwrap();
        assert!(matches!(err, DiError::DuplicateRegistration(key) if key == key_of::<Repository>()));

        assert_eq!(registry.len(), 1);
        let descriptor = registry.lookup(&key_of::<Repository>()).unwrap();
        assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
    }

    #[test]
    fn test_abstract_contract_has_no_implementation() {
        let mut registry = BindingRegistry::new();
        registry.bind::<dyn Store>().unwrap();

        let descriptor = registry.lookup(&key_of::<dyn Store>()).unwrap();
        assert!(descriptor.implementation().is_none());
        assert!(descriptor.strategy().is_none());
    }

    #[test]
    fn test_frozen_registry_rejects_bind() {
        let mut registry = BindingRegistry::new();
        registry.freeze();

        assert!(matches!(
            registry.bind_self::<Repository>().err(),
            Some(DiError::RegistryFrozen(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_of_unbound_key() {
        let registry = BindingRegistry::new();
        assert!(matches!(
            registry.lookup(&key_of::<Repository>()),
            Err(DiError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_descriptors_keep_registration_order() {
        let mut registry = BindingRegistry::new();
        registry.bind::<dyn Store>().unwrap();
        registry.bind_self::<Repository>().unwrap();

        let contracts: Vec<Key> = registry.descriptors().iter().map(|d| d.contract()).collect();
        assert_eq!(contracts, vec![key_of::<dyn Store>(), key_of::<Repository>()]);
    }
}
