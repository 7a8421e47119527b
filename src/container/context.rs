//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for constructors to resolve their dependencies.

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to constructors and injection methods for resolving
/// dependencies.
///
/// Parameter tuples declared with [`Constructor::new`](crate::Constructor::new)
/// are fetched through it; it implements [`Resolver`](crate::Resolver), so
/// custom [`Dependency`](crate::Dependency) implementations can resolve
/// whatever they need.
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    /// Creates a new ResolverContext wrapping the given resolver.
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }
}
