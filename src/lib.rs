//! # ferrous-bind
//!
//! Staged-binding dependency injection for Rust: bind contracts to
//! implementations, install and validate the graph, then resolve.
//!
//! ## Features
//!
//! - **Staged binder**: `to` → `from_new` / `from_external_provider` →
//!   `as_single` / `as_transient` → `non_lazy`, out-of-order calls rejected
//! - **Declared constructors**: one recipe per implementation, parameter list
//!   taken from the constructor's tuple type, no runtime signature inspection
//! - **Singleton and transient lifetimes**, eager or lazy singletons
//! - **Lifecycle queues**: initialize and dispose hooks run in construction
//!   order on the owning scope's start and teardown signals
//! - **Install-time validation**: every binding is constructed once before
//!   go-live so configuration defects surface early
//! - **Circular dependency detection** with the full construction path
//! - **Host-managed implementations** created through an external provider
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_bind::{Container, Constructor, Injectable, Recipe, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! impl Injectable for Database {
//!     fn recipe() -> Recipe<Self> {
//!         Constructor::new(|(): ()| Ok(Database { url: "postgres://localhost".to_string() })).into()
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn recipe() -> Recipe<Self> {
//!         Constructor::new(|(db,): (Arc<Database>,)| Ok(UserService { db })).into()
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.bind_self::<Database>().unwrap().as_single().unwrap();
//! container.bind_self::<UserService>().unwrap();
//! container.install(&[]).unwrap();
//!
//! let users = container.resolve::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Trait Contracts
//!
//! ```rust
//! use ferrous_bind::{implements, Container, Constructor, Injectable, Recipe, Resolver};
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//! impl Injectable for ConsoleLogger {
//!     fn recipe() -> Recipe<Self> {
//!         Constructor::new(|(): ()| Ok(ConsoleLogger)).into()
//!     }
//! }
//! implements!(ConsoleLogger => dyn Logger);
//!
//! let mut container = Container::new();
//! container.bind::<dyn Logger>().unwrap().to::<ConsoleLogger>().unwrap().as_single().unwrap();
//! container.install(&[]).unwrap();
//!
//! container.resolve_required::<dyn Logger>().log("Hello, World!");
//! ```

// Module declarations
pub mod binder;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod graph_export;
pub mod host;
pub mod installer;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod recipe;
pub mod registration;
pub mod traits;

// Internal modules
mod internal;

pub use binder::{BindStage, Binder};
pub use config::ContainerConfig;
pub use container::{Container, InstallReport, InstallState, ResolverContext};
pub use descriptors::{BindingDescriptor, CreationStrategy, ImplementationKind};
pub use error::{BoxError, DiError, DiResult};
pub use graph_export::{BindingGraph, DependencyType, GraphEdge, GraphNode};
pub use host::{ExternalProvider, HostHandle};
pub use installer::Installer;
pub use key::{key_of, Key};
pub use lifetime::{Eagerness, Lifetime};
pub use observer::{DiObserver, TracingObserver};
pub use recipe::{
    Constructor, Dependencies, Dependency, HostedRecipe, Implements, Injectable, InjectionPoint,
    Recipe,
};
pub use registration::BindingRegistry;
pub use traits::{Dispose, Initializable, Resolver, ResolverCore};
