//! Construction recipes: the single designated constructor of an
//! implementation, its ordered dependency plan and its capability tags.
//!
//! Nothing here inspects signatures at resolution time. The parameter list of
//! a constructor is the tuple type of its closure argument; the keys of that
//! tuple become the binding's constructor plan when the implementation is
//! selected with [`Binder::to`](crate::Binder::to).

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::descriptors::ImplementationKind;
use crate::error::{BoxError, DiError, DiResult};
use crate::host::HostHandle;
use crate::key::{key_of, Key};
use crate::registration::AnyArc;
use crate::traits::{Dispose, Initializable, Resolver};

/// One constructor or injection-method parameter.
///
/// Implemented for `Arc<T>`: the parameter is resolved through the container
/// under the key of `T`, which may be a trait object.
pub trait Dependency: Sized {
    /// Key this parameter is resolved under.
    fn key() -> Key;
    /// Resolves the parameter.
    fn fetch(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

impl<T> Dependency for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn key() -> Key {
        key_of::<T>()
    }

    fn fetch(resolver: &ResolverContext<'_>) -> DiResult<Self> {
        resolver.resolve::<T>()
    }
}

/// An ordered parameter list, implemented for tuples of [`Dependency`].
///
/// Parameters are resolved left to right, in declaration order.
pub trait Dependencies: Sized {
    /// Parameter keys in declaration order.
    fn keys() -> Vec<Key>;
    /// Resolves every parameter, left to right.
    fn fetch(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<Key> {
        Vec::new()
    }

    fn fetch(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(())
    }
}

macro_rules! impl_dependencies {
    ($($param:ident),+) => {
        impl<$($param: Dependency),+> Dependencies for ($($param,)+) {
            fn keys() -> Vec<Key> {
                vec![$($param::key()),+]
            }

            fn fetch(resolver: &ResolverContext<'_>) -> DiResult<Self> {
                Ok(($($param::fetch(resolver)?,)+))
            }
        }
    };
}

impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);

/// A concrete type the container can construct.
///
/// `recipe` names the one way to build the type: a plain [`Constructor`] or a
/// [`HostedRecipe`] for host-managed objects created through the container's
/// external provider.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{Constructor, Injectable, Recipe};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { config: Arc<Config> }
///
/// impl Injectable for Database {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(config,): (Arc<Config>,)| Ok(Database { config })).into()
///     }
/// }
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    fn recipe() -> Recipe<Self>;
}

/// "Satisfies contract `C`": an implementation usable with `to::<Self>()`
/// on a binding for `C`.
///
/// Every injectable type satisfies itself. Trait-object contracts are declared
/// per implementation, usually with [`implements!`](crate::implements).
pub trait Implements<C: ?Sized>: Injectable {
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T: Injectable> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that an implementation satisfies one or more trait-object contracts.
///
/// ```rust
/// use ferrous_bind::{implements, Constructor, Injectable, Recipe};
///
/// trait Logger: Send + Sync { fn log(&self, msg: &str); }
/// trait Flush: Send + Sync { fn flush(&self); }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger { fn log(&self, msg: &str) { println!("{msg}"); } }
/// impl Flush for ConsoleLogger { fn flush(&self) {} }
/// impl Injectable for ConsoleLogger {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(ConsoleLogger)).into()
///     }
/// }
///
/// implements!(ConsoleLogger => dyn Logger, dyn Flush);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}

type BuildFn<T> = Box<dyn for<'a> Fn(&ResolverContext<'a>) -> Result<T, BoxError> + Send + Sync>;
type AttachFn<T> = Box<dyn Fn(HostHandle) -> Result<T, BoxError> + Send + Sync>;
type InvokeFn<T> = Box<dyn for<'a> Fn(&T, &ResolverContext<'a>) -> Result<(), BoxError> + Send + Sync>;

/// The designated constructor of a plain implementation.
pub struct Constructor<T> {
    plan: Vec<Key>,
    build: BuildFn<T>,
    initialize: Option<fn(Arc<T>) -> Arc<dyn Initializable>>,
    dispose: Option<fn(Arc<T>) -> Arc<dyn Dispose>>,
}

fn as_initializable<T: Initializable>(value: Arc<T>) -> Arc<dyn Initializable> {
    value
}

fn as_disposable<T: Dispose>(value: Arc<T>) -> Arc<dyn Dispose> {
    value
}

impl<T: Send + Sync + 'static> Constructor<T> {
    /// Declares the constructor. The closure's tuple argument is the
    /// parameter list; its element keys become the constructor plan.
    pub fn new<D, F>(constructor: F) -> Self
    where
        D: Dependencies + 'static,
        F: Fn(D) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            plan: D::keys(),
            build: Box::new(move |resolver: &ResolverContext<'_>| constructor(D::fetch(resolver)?)),
            initialize: None,
            dispose: None,
        }
    }

    /// Tags the implementation as initializable: every constructed instance
    /// joins the initialize queue flushed on `start`.
    pub fn initializable(mut self) -> Self
    where
        T: Initializable,
    {
        self.initialize = Some(as_initializable::<T>);
        self
    }

    /// Tags the implementation as disposable: every constructed instance
    /// joins the dispose queue flushed on `teardown`.
    pub fn disposable(mut self) -> Self
    where
        T: Dispose,
    {
        self.dispose = Some(as_disposable::<T>);
        self
    }

    /// Parameter keys in declaration order.
    pub fn plan(&self) -> &[Key] {
        &self.plan
    }
}

/// A method-level injection point on a host-managed implementation.
pub struct InjectionPoint<T> {
    name: &'static str,
    plan: Vec<Key>,
    invoke: InvokeFn<T>,
}

impl<T> InjectionPoint<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn plan(&self) -> &[Key] {
        &self.plan
    }
}

/// Recipe for a host-managed implementation.
///
/// The external provider creates the host object and hands back a
/// [`HostHandle`]; `attach` builds the implementation around it. Injection
/// methods then run once each, in the order they were declared.
pub struct HostedRecipe<T> {
    attach: AttachFn<T>,
    points: Vec<InjectionPoint<T>>,
}

impl<T: Send + Sync + 'static> HostedRecipe<T> {
    pub fn new<F>(attach: F) -> Self
    where
        F: Fn(HostHandle) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            attach: Box::new(attach),
            points: Vec::new(),
        }
    }

    /// Declares an injection method. Its parameters are resolved left to
    /// right, then the method is invoked once on the fresh instance.
    pub fn inject<D, F>(mut self, name: &'static str, method: F) -> Self
    where
        D: Dependencies + 'static,
        F: Fn(&T, D) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.points.push(InjectionPoint {
            name,
            plan: D::keys(),
            invoke: Box::new(move |target: &T, resolver: &ResolverContext<'_>| {
                method(target, D::fetch(resolver)?)
            }),
        });
        self
    }

    pub fn injection_points(&self) -> &[InjectionPoint<T>] {
        &self.points
    }
}

enum RecipeKind<T> {
    Plain(Constructor<T>),
    Hosted(HostedRecipe<T>),
}

/// How an [`Injectable`] type is built.
pub struct Recipe<T> {
    kind: RecipeKind<T>,
}

impl<T> Recipe<T> {
    pub fn kind(&self) -> ImplementationKind {
        match self.kind {
            RecipeKind::Plain(_) => ImplementationKind::Plain,
            RecipeKind::Hosted(_) => ImplementationKind::HostManaged,
        }
    }
}

impl<T> From<Constructor<T>> for Recipe<T> {
    fn from(constructor: Constructor<T>) -> Self {
        Self { kind: RecipeKind::Plain(constructor) }
    }
}

impl<T> From<HostedRecipe<T>> for Recipe<T> {
    fn from(hosted: HostedRecipe<T>) -> Self {
        Self { kind: RecipeKind::Hosted(hosted) }
    }
}

// ===== Type-erased form stored in descriptors =====

/// Output of a plain construction: the contract instance plus the lifecycle
/// views the resolver queues.
pub(crate) struct Built {
    pub(crate) instance: AnyArc,
    pub(crate) initializable: Option<Arc<dyn Initializable>>,
    pub(crate) disposable: Option<Arc<dyn Dispose>>,
}

pub(crate) type PlainFactory =
    Box<dyn for<'a> Fn(&ResolverContext<'a>) -> Result<Built, BoxError> + Send + Sync>;
pub(crate) type HostedFactory =
    Box<dyn for<'a> Fn(HostHandle, &ResolverContext<'a>) -> Result<AnyArc, BoxError> + Send + Sync>;

pub(crate) enum ErasedFactory {
    Plain {
        plan: Vec<Key>,
        build: PlainFactory,
    },
    Hosted {
        injection_plan: Vec<(&'static str, Vec<Key>)>,
        attach: HostedFactory,
    },
}

/// An implementation selected for a contract, with its recipe erased to the
/// contract type.
pub(crate) struct ErasedImplementation {
    pub(crate) key: Key,
    pub(crate) initializable: bool,
    pub(crate) disposable: bool,
    pub(crate) factory: ErasedFactory,
}

impl ErasedImplementation {
    pub(crate) fn of<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Implements<C>,
    {
        let key = key_of::<I>();
        match I::recipe().kind {
            RecipeKind::Plain(constructor) => {
                let Constructor { plan, build, initialize, dispose } = constructor;
                let factory: PlainFactory = Box::new(move |resolver: &ResolverContext<'_>| {
                    let value = Arc::new(build(resolver)?);
                    let initializable = initialize.map(|view| view(value.clone()));
                    let disposable = dispose.map(|view| view(value.clone()));
                    let contract: Arc<C> = <I as Implements<C>>::upcast(value);
                    Ok(Built {
                        instance: Arc::new(contract),
                        initializable,
                        disposable,
                    })
                });
                Self {
                    key,
                    initializable: initialize.is_some(),
                    disposable: dispose.is_some(),
                    factory: ErasedFactory::Plain { plan, build: factory },
                }
            }
            RecipeKind::Hosted(hosted) => {
                let HostedRecipe { attach, points } = hosted;
                let injection_plan = points
                    .iter()
                    .map(|point| (point.name, point.plan.clone()))
                    .collect();
                let factory: HostedFactory = Box::new(move |handle, resolver: &ResolverContext<'_>| {
                    let value = Arc::new(attach(handle)?);
                    for point in &points {
                        (point.invoke)(value.as_ref(), resolver).map_err(|source| {
                            DiError::Injection { method: point.name, source }
                        })?;
                    }
                    let contract: Arc<C> = <I as Implements<C>>::upcast(value);
                    Ok(Arc::new(contract) as AnyArc)
                });
                Self {
                    key,
                    initializable: false,
                    disposable: false,
                    factory: ErasedFactory::Hosted { injection_plan, attach: factory },
                }
            }
        }
    }

    pub(crate) fn kind(&self) -> ImplementationKind {
        match self.factory {
            ErasedFactory::Plain { .. } => ImplementationKind::Plain,
            ErasedFactory::Hosted { .. } => ImplementationKind::HostManaged,
        }
    }

    pub(crate) fn constructor_plan(&self) -> &[Key] {
        match &self.factory {
            ErasedFactory::Plain { plan, .. } => plan,
            ErasedFactory::Hosted { .. } => &[],
        }
    }

    pub(crate) fn injection_plan(&self) -> Vec<(&'static str, &[Key])> {
        match &self.factory {
            ErasedFactory::Plain { .. } => Vec::new(),
            ErasedFactory::Hosted { injection_plan, .. } => injection_plan
                .iter()
                .map(|(name, plan)| (*name, plan.as_slice()))
                .collect(),
        }
    }
}
