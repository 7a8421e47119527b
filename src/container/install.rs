//! Installation pipeline: register, validate, activate eager singletons.

use std::mem;

use tracing::{debug, info, warn};

use super::Container;
use crate::error::{DiError, DiResult};
use crate::host::HostHandle;
use crate::installer::Installer;
use crate::internal::LifecycleQueues;
use crate::lifetime::Eagerness;
use crate::traits::ResolverCore;

/// Progress of a container through its installation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallState {
    /// Accepting bindings; `install` not called yet.
    Uninstalled,
    /// Installers are registering bindings.
    Installing,
    /// The dry-run validation pass is resolving every binding.
    Validating,
    /// Registration is closed; eager singletons are constructed.
    Installed,
    /// A phase of `install` failed. Terminal: the container cannot be
    /// installed again, and the registry may already be frozen.
    Failed,
}

/// Summary of a successful [`Container::install`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Bindings registered when registration closed.
    pub bindings: usize,
    /// Bindings resolved by the validation pass; zero when it did not run.
    pub validated: usize,
    /// Eager singletons constructed.
    pub eager: usize,
    /// Host-managed instances created by the validation pass and destroyed
    /// right after it.
    pub hosted_destroyed: usize,
}

impl Container {
    /// Runs the installation pipeline.
    ///
    /// 1. Every installer registers its bindings, in order.
    /// 2. Registration closes; a binding without an implementation fails
    ///    with `MissingImplementation`.
    /// 3. When [`validate_on_install`](crate::ContainerConfig::validate_on_install)
    ///    is set, every binding is resolved once. The first failure aborts
    ///    installation as `DiError::Validation`. Afterwards the dry-run
    ///    instances are discarded: their queued hooks run once, their host
    ///    objects are destroyed, and the singleton cache goes back to the
    ///    instances resolved before `install`.
    /// 4. Eager singletons are constructed and cached for good.
    ///
    /// A container installs once; a second call fails with `AlreadyInstalled`,
    /// whether the first one succeeded or left the container
    /// [`Failed`](InstallState::Failed).
    pub fn install(&mut self, installers: &[&dyn Installer]) -> DiResult<InstallReport> {
        if self.install_state != InstallState::Uninstalled {
            return Err(DiError::AlreadyInstalled);
        }

        let outcome = self.run_pipeline(installers);
        if let Err(err) = &outcome {
            warn!(state = ?self.install_state, error = %err, "install failed");
            self.install_state = InstallState::Failed;
        }
        outcome
    }

    fn run_pipeline(&mut self, installers: &[&dyn Installer]) -> DiResult<InstallReport> {
        self.install_state = InstallState::Installing;
        info!(installers = installers.len(), "installing bindings");
        for installer in installers {
            installer.install_bindings(&mut self.registry)?;
        }
        self.close_registration()?;

        let mut report = InstallReport {
            bindings: self.registry.len(),
            ..InstallReport::default()
        };

        if self.config.validate_on_install {
            self.install_state = InstallState::Validating;
            let (validated, hosted_destroyed) = self.validate()?;
            report.validated = validated;
            report.hosted_destroyed = hosted_destroyed;
        }

        report.eager = self.activate_eager()?;
        self.install_state = InstallState::Installed;
        info!(
            bindings = report.bindings,
            validated = report.validated,
            eager = report.eager,
            "container installed"
        );
        Ok(report)
    }

    fn close_registration(&mut self) -> DiResult<()> {
        if let Some(incomplete) = self
            .registry
            .descriptors()
            .iter()
            .find(|descriptor| descriptor.implementation().is_none())
        {
            return Err(DiError::MissingImplementation(incomplete.contract()));
        }
        self.registry.freeze();
        Ok(())
    }

    /// Dry run over every binding. Returns the number of bindings validated
    /// and host objects destroyed.
    fn validate(&self) -> DiResult<(usize, usize)> {
        info!(bindings = self.registry.len(), "validating bindings");

        // Instances resolved before install belong to the caller, not the dry run.
        let (cached, preserved) = {
            let mut state = self.state.borrow_mut();
            state.hosted = Some(Vec::new());
            (mem::take(&mut state.singletons), mem::take(&mut state.queues))
        };

        let outcome = self.registry.descriptors().iter().try_for_each(|descriptor| {
            let key = descriptor.contract();
            self.resolve_any(&key)
                .map(drop)
                .map_err(|source| DiError::Validation { key, source: Box::new(source) })
        });

        let (hosted, mut dry_run) = {
            let mut state = self.state.borrow_mut();
            state.singletons = cached;
            let hosted = state.hosted.take().unwrap_or_default();
            (hosted, mem::replace(&mut state.queues, preserved))
        };

        match &outcome {
            Ok(()) => {
                let initialized = LifecycleQueues::initialize_all(dry_run.take_initializables());
                let disposed = LifecycleQueues::dispose_all(dry_run.take_disposables());
                debug!(initialized, disposed, "flushed validation queues");
            }
            Err(err) => warn!(error = %err, "validation failed"),
        }

        let destroyed = self.destroy_hosted(hosted);
        outcome.map(|()| (self.registry.len(), destroyed))
    }

    fn destroy_hosted(&self, handles: Vec<HostHandle>) -> usize {
        let Some(provider) = self.provider.as_ref() else {
            return 0;
        };
        let count = handles.len();
        for handle in handles {
            provider.destroy(handle);
        }
        if count > 0 {
            debug!(count, "destroyed validation host objects");
        }
        count
    }

    fn activate_eager(&self) -> DiResult<usize> {
        let mut count = 0;
        for descriptor in self.registry.descriptors() {
            if descriptor.eagerness() == Eagerness::Eager {
                self.resolve_any(&descriptor.contract())?;
                count += 1;
            }
        }
        Ok(count)
    }
}
