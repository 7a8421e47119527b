//! Core traits for the dependency injection container.

mod lifecycle;
mod resolver;

pub use lifecycle::{Dispose, Initializable};
pub use resolver::{Resolver, ResolverCore};
