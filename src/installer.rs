//! Installers: reusable groups of bindings.

use crate::error::DiResult;
use crate::registration::BindingRegistry;

/// A group of related bindings registered during [`Container::install`](crate::Container::install).
///
/// Installers run in the order they are passed, against the container's
/// registry; any error aborts installation.
///
/// # Example
///
/// ```rust
/// use ferrous_bind::{BindingRegistry, Container, Constructor, DiResult, Injectable, Installer, Recipe, Resolver};
///
/// struct Settings;
/// impl Injectable for Settings {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Settings)).into()
///     }
/// }
///
/// struct SettingsInstaller;
///
/// impl Installer for SettingsInstaller {
///     fn install_bindings(&self, registry: &mut BindingRegistry) -> DiResult<()> {
///         registry.bind_self::<Settings>()?.as_single()?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut container = Container::new();
/// container.install(&[&SettingsInstaller])?;
/// assert!(container.resolve::<Settings>().is_ok());
/// # Ok(())
/// # }
/// ```
pub trait Installer {
    /// Register this installer's bindings.
    fn install_bindings(&self, registry: &mut BindingRegistry) -> DiResult<()>;
}

/// Closures taking the registry are installers too.
///
/// ```rust
/// use ferrous_bind::{BindingRegistry, Container, DiResult};
///
/// let noop = |_: &mut BindingRegistry| -> DiResult<()> { Ok(()) };
/// let mut container = Container::new();
/// container.install(&[&noop]).unwrap();
/// ```
impl<F> Installer for F
where
    F: Fn(&mut BindingRegistry) -> DiResult<()>,
{
    fn install_bindings(&self, registry: &mut BindingRegistry) -> DiResult<()> {
        self(registry)
    }
}
