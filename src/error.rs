//! Error types for the dependency injection container.

use thiserror::Error;

use crate::binder::BindStage;
use crate::descriptors::{CreationStrategy, ImplementationKind};
use crate::key::Key;

/// Boxed error returned by user constructors, injection methods and providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Every variant is a configuration or programming defect: nothing here is
/// retried or recovered internally, all of them propagate to the caller of
/// `bind`, `install` or `resolve`.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{Container, DiError, Resolver, key_of};
///
/// struct Unbound;
///
/// let container = Container::new();
/// match container.resolve::<Unbound>() {
///     Err(DiError::NotRegistered(key)) => assert_eq!(key, key_of::<Unbound>()),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// A binder operation was attempted out of its allowed sequence.
    #[error("invalid binding operation order for {key}: {attempted:?} was attempted, but the earliest allowed operation is {allowed:?}")]
    OrderingViolation {
        key: Key,
        attempted: BindStage,
        allowed: BindStage,
    },
    /// `bind` was called twice for the same contract.
    #[error("{0} is already registered")]
    DuplicateRegistration(Key),
    /// `resolve` was called for a contract that was never bound.
    #[error("{0} is not registered")]
    NotRegistered(Key),
    /// `bind` was called after installation completed.
    #[error("cannot bind {0}: the container is already installed")]
    RegistryFrozen(Key),
    /// The binding has no implementation to construct.
    #[error("{0} has no implementation; bind it with `to::<Impl>()` or `bind_self`")]
    MissingImplementation(Key),
    /// The creation strategy does not fit the implementation kind.
    #[error("{key} is implemented by a {kind:?} type and cannot use {strategy:?}")]
    StrategyMismatch {
        key: Key,
        strategy: CreationStrategy,
        kind: ImplementationKind,
    },
    /// `non_lazy` was requested for a binding that is not a singleton.
    #[error("{0} is transient and cannot be constructed eagerly")]
    EagerTransient(Key),
    /// A host-managed binding was resolved on a container with no provider.
    #[error("{0} requires an external provider, but none is attached to the container")]
    NoExternalProvider(Key),
    /// Creation of a binding failed; wraps the inner cause.
    #[error("failed to construct {key}")]
    Construction {
        key: Key,
        #[source]
        source: BoxError,
    },
    /// An injection method of a host-managed instance failed.
    #[error("injection method `{method}` failed")]
    Injection {
        method: &'static str,
        #[source]
        source: BoxError,
    },
    /// Circular dependency detected (includes path)
    #[error("circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("max resolution depth {0} exceeded")]
    DepthExceeded(usize),
    /// Type downcast failed
    #[error("type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// The install-time dry run could not construct a binding.
    #[error("installation validation failed for {key}")]
    Validation {
        key: Key,
        #[source]
        source: Box<DiError>,
    },
    /// `install` was called on a container that already ran its pipeline,
    /// successfully or not.
    #[error("install has already run on this container")]
    AlreadyInstalled,
}

impl DiError {
    /// Walks `Construction`, `Validation` and `Injection` wrappers down to the
    /// innermost container error.
    ///
    /// When the innermost cause is a user error rather than a `DiError`, the
    /// last `DiError` in the chain is returned.
    ///
    /// ```rust
    /// use ferrous_bind::{DiError, key_of};
    ///
    /// let inner = DiError::NotRegistered(key_of::<u8>());
    /// let wrapped = DiError::Construction { key: key_of::<u16>(), source: Box::new(inner) };
    /// assert!(matches!(wrapped.root_cause(), DiError::NotRegistered(_)));
    /// ```
    pub fn root_cause(&self) -> &DiError {
        let mut current = self;
        loop {
            let next = match current {
                DiError::Construction { source, .. } | DiError::Injection { source, .. } => {
                    source.downcast_ref::<DiError>()
                }
                DiError::Validation { source, .. } => Some(source.as_ref()),
                _ => None,
            };
            match next {
                Some(inner) => current = inner,
                None => return current,
            }
        }
    }

    /// Keys of the bindings under construction, outermost first.
    pub fn construction_path(&self) -> Vec<Key> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(err) = current {
            current = match err {
                DiError::Construction { key, source } => {
                    path.push(*key);
                    source.downcast_ref::<DiError>()
                }
                DiError::Injection { source, .. } => source.downcast_ref::<DiError>(),
                DiError::Validation { source, .. } => Some(source.as_ref()),
                _ => None,
            };
        }
        path
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
