use ferrous_bind::{
    key_of, BindStage, Binder, Constructor, Container, ContainerConfig, DiError, DiResult,
    Eagerness, Initializable, Injectable, Lifetime, Recipe, Resolver,
};
use proptest::prelude::*;
use std::sync::Arc;

struct Gadget;

impl Initializable for Gadget {
    fn initialize(&self) {}
}

impl Injectable for Gadget {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(): ()| Ok(Gadget)).initializable().into()
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    To,
    FromNew,
    AsSingle,
    AsTransient,
    NonLazy,
}

impl Op {
    fn stage(self) -> BindStage {
        match self {
            Op::To => BindStage::To,
            Op::FromNew => BindStage::From,
            Op::AsSingle | Op::AsTransient => BindStage::Scope,
            Op::NonLazy => BindStage::NonLazy,
        }
    }

    fn apply(self, binder: Binder<'_, Gadget>) -> DiResult<Binder<'_, Gadget>> {
        match self {
            Op::To => binder.to::<Gadget>(),
            Op::FromNew => binder.from_new(),
            Op::AsSingle => binder.as_single(),
            Op::AsTransient => binder.as_transient(),
            Op::NonLazy => binder.non_lazy(),
        }
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::To),
        Just(Op::FromNew),
        Just(Op::AsSingle),
        Just(Op::AsTransient),
        Just(Op::NonLazy),
    ]
}

/// Expected outcome of a binder chain: index of the first rejected
/// operation, and the policy left behind.
struct Model {
    minimum: BindStage,
    lifetime: Lifetime,
    eager: bool,
}

impl Model {
    fn accepts(&mut self, op: Op) -> bool {
        if op.stage() < self.minimum {
            return false;
        }
        match op {
            Op::To => self.minimum = BindStage::From,
            Op::FromNew => self.minimum = BindStage::Scope,
            Op::AsSingle => {
                self.lifetime = Lifetime::Singleton;
                self.minimum = BindStage::Scope;
            }
            Op::AsTransient => {
                self.lifetime = Lifetime::Transient;
                self.minimum = BindStage::Scope;
            }
            Op::NonLazy => {
                if self.lifetime != Lifetime::Singleton {
                    return false;
                }
                self.eager = true;
                self.minimum = BindStage::Sealed;
            }
        }
        true
    }
}

proptest! {
    #[test]
    fn binder_chains_follow_stage_order(ops in prop::collection::vec(op(), 0..8)) {
        let mut model = Model { minimum: BindStage::All, lifetime: Lifetime::Transient, eager: false };
        let mut container = Container::new();

        let mut binder = container.bind_self::<Gadget>().unwrap();
        let mut rejected = None;
        for op in &ops {
            let expected = model.accepts(*op);
            match op.apply(binder) {
                Ok(next) => {
                    prop_assert!(expected, "{:?} accepted at {:?}", op, model.minimum);
                    prop_assert_eq!(next.stage(), model.minimum);
                    binder = next;
                }
                Err(err) => {
                    prop_assert!(!expected, "{:?} rejected: {}", op, err);
                    let is_ordering_error = matches!(
                        err,
                        DiError::OrderingViolation { .. } | DiError::EagerTransient(_)
                    );
                    prop_assert!(is_ordering_error);
                    rejected = Some(err);
                    break;
                }
            }
        }

        let descriptor = container.registry().lookup(&key_of::<Gadget>()).unwrap();
        if rejected.is_none() {
            prop_assert_eq!(descriptor.lifetime(), model.lifetime);
            prop_assert_eq!(descriptor.eagerness() == Eagerness::Eager, model.eager);
        }
        prop_assert!(descriptor.eagerness() != Eagerness::Eager || descriptor.lifetime() == Lifetime::Singleton);
    }

    #[test]
    fn resolutions_respect_lifetime(singleton in any::<bool>(), count in 1usize..16) {
        let mut container = Container::with_config(ContainerConfig::new().validate_on_install(false));
        {
            let binder = container.bind_self::<Gadget>().unwrap();
            if singleton {
                binder.as_single().unwrap();
            }
        }
        container.install(&[]).unwrap();

        let instances: Vec<Arc<Gadget>> =
            (0..count).map(|_| container.resolve_required::<Gadget>()).collect();
        let distinct = instances
            .iter()
            .enumerate()
            .filter(|(i, a)| !instances[..*i].iter().any(|b| Arc::ptr_eq(a, b)))
            .count();

        let expected = if singleton { 1 } else { count };
        prop_assert_eq!(distinct, expected);
        prop_assert_eq!(container.pending_initializables(), expected);
        prop_assert_eq!(container.start(), expected);
        prop_assert_eq!(container.pending_initializables(), 0);
    }
}
