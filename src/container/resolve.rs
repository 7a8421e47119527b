//! Recursive resolution: singleton cache, creation strategies, lifecycle queues.

use std::time::Instant;

use tracing::debug;

use super::{Container, ResolverContext};
use crate::descriptors::BindingDescriptor;
use crate::error::{BoxError, DiError, DiResult};
use crate::internal::StackGuard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::recipe::{ErasedFactory, ErasedImplementation};
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        if !self.observers.has_observers() {
            return self.resolve_binding(key);
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = self.resolve_binding(key);
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(err) => self.observers.failed(key, err),
        }
        result
    }
}

impl Container {
    fn resolve_binding(&self, key: &Key) -> DiResult<AnyArc> {
        let descriptor = self.registry.get(key).ok_or(DiError::NotRegistered(*key))?;

        let singleton = descriptor.lifetime() == Lifetime::Singleton;
        if singleton {
            if let Some(instance) = self.state.borrow().singletons.get(key) {
                return Ok(instance.clone());
            }
        }

        let implementation = descriptor
            .erased()
            .ok_or(DiError::MissingImplementation(*key))?;

        let instance = {
            let _frame = StackGuard::enter(&self.in_progress, *key, self.config.max_depth)?;
            self.create(descriptor, implementation)
                .map_err(|source| DiError::Construction { key: *key, source })?
        };

        if singleton {
            self.state.borrow_mut().singletons.insert(*key, instance.clone());
        }
        Ok(instance)
    }

    fn create(
        &self,
        descriptor: &BindingDescriptor,
        implementation: &ErasedImplementation,
    ) -> Result<AnyArc, BoxError> {
        let ctx = ResolverContext::new(self);
        match &implementation.factory {
            ErasedFactory::Plain { build, .. } => {
                let built = build(&ctx)?;
                debug!(
                    contract = %descriptor.contract(),
                    implementation = %implementation.key,
                    lifetime = ?descriptor.lifetime(),
                    "constructed"
                );

                let mut state = self.state.borrow_mut();
                if let Some(instance) = built.initializable {
                    state.queues.push_initializable(instance);
                }
                if let Some(instance) = built.disposable {
                    state.queues.push_disposable(instance);
                }
                Ok(built.instance)
            }
            ErasedFactory::Hosted { attach, .. } => {
                let provider = self
                    .provider
                    .as_ref()
                    .ok_or(DiError::NoExternalProvider(descriptor.contract()))?;

                let handle = provider.create_child(implementation.key)?;
                let instance = match attach(handle, &ctx) {
                    Ok(instance) => instance,
                    Err(err) => {
                        provider.destroy(handle);
                        return Err(err);
                    }
                };
                debug!(
                    contract = %descriptor.contract(),
                    implementation = %implementation.key,
                    handle = handle.raw(),
                    "created host-managed instance"
                );

                if let Some(captured) = self.state.borrow_mut().hosted.as_mut() {
                    captured.push(handle);
                }
                Ok(instance)
            }
        }
    }
}
