//! Binding lifetime and eagerness definitions.

/// Binding lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{Container, Injectable, Constructor, Recipe, Resolver};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Injectable for Database {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Database)).into()
///     }
/// }
///
/// struct RequestModel;
/// impl Injectable for RequestModel {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(RequestModel)).into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_self::<Database>().unwrap().as_single().unwrap();
/// container.bind_self::<RequestModel>().unwrap().as_transient().unwrap();
/// container.install(&[]).unwrap();
///
/// // Singleton: same instance every time
/// let db1 = container.resolve::<Database>().unwrap();
/// let db2 = container.resolve::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Transient: always different instances
/// let m1 = container.resolve::<RequestModel>().unwrap();
/// let m2 = container.resolve::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&m1, &m2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Single instance per container, cached forever
    ///
    /// Created once when first requested (or during install when eager) and
    /// shared by every caller for the lifetime of the container.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}

/// When a singleton binding is first constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub enum Eagerness {
    /// Constructed on first resolution.
    Lazy,
    /// Constructed while the container installs. Only valid for singletons.
    Eager,
}
