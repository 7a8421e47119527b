use ferrous_bind::{
    key_of, Constructor, Container, ContainerConfig, DiError, Injectable, Recipe, Resolver,
};
use std::sync::Arc;

struct Chicken;
struct Egg;

impl Injectable for Chicken {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(_egg,): (Arc<Egg>,)| Ok(Chicken)).into()
    }
}

impl Injectable for Egg {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(_chicken,): (Arc<Chicken>,)| Ok(Egg)).into()
    }
}

struct Ouroboros;

impl Injectable for Ouroboros {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(_tail,): (Arc<Ouroboros>,)| Ok(Ouroboros)).into()
    }
}

struct Level1;
struct Level2;
struct Level3;

impl Injectable for Level1 {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(_next,): (Arc<Level2>,)| Ok(Level1)).into()
    }
}

impl Injectable for Level2 {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(_next,): (Arc<Level3>,)| Ok(Level2)).into()
    }
}

impl Injectable for Level3 {
    fn recipe() -> Recipe<Self> {
        Constructor::new(|(): ()| Ok(Level3)).into()
    }
}

fn container(config: ContainerConfig) -> Container {
    Container::with_config(config.validate_on_install(false))
}

#[test]
fn test_two_node_cycle_fails_fast() {
    let mut c = container(ContainerConfig::new());
    c.bind_self::<Chicken>().unwrap().as_single().unwrap();
    c.bind_self::<Egg>().unwrap().as_single().unwrap();
    c.install(&[]).unwrap();

    let err = c.resolve::<Chicken>().err().unwrap();
    match err.root_cause() {
        DiError::Circular(path) => {
            assert_eq!(
                path,
                &vec![
                    key_of::<Chicken>().display_name(),
                    key_of::<Egg>().display_name(),
                    key_of::<Chicken>().display_name(),
                ]
            );
        }
        other => panic!("expected a cycle, got {other}"),
    }
    assert_eq!(err.construction_path(), vec![key_of::<Chicken>(), key_of::<Egg>()]);
    assert_eq!(c.cached_count(), 0);
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let mut c = container(ContainerConfig::new());
    c.bind_self::<Ouroboros>().unwrap().as_transient().unwrap();
    c.install(&[]).unwrap();

    let err = c.resolve::<Ouroboros>().err().unwrap();
    assert!(matches!(err.root_cause(), DiError::Circular(path) if path.len() == 2));
    assert!(err.root_cause().to_string().starts_with("circular dependency: "));
}

#[test]
fn test_cycle_caught_by_validation() {
    let mut c = Container::with_config(ContainerConfig::new().validate_on_install(true));
    c.bind_self::<Chicken>().unwrap();
    c.bind_self::<Egg>().unwrap();

    let err = c.install(&[]).err().unwrap();
    assert!(matches!(err, DiError::Validation { key, .. } if key == key_of::<Chicken>()));
    assert!(matches!(err.root_cause(), DiError::Circular(_)));
}

#[test]
fn test_depth_limit() {
    let mut c = container(ContainerConfig::new().max_depth(2));
    c.bind_self::<Level1>().unwrap();
    c.bind_self::<Level2>().unwrap();
    c.bind_self::<Level3>().unwrap();
    c.install(&[]).unwrap();

    assert!(c.resolve::<Level2>().is_ok());
    let err = c.resolve::<Level1>().err().unwrap();
    assert!(matches!(err.root_cause(), DiError::DepthExceeded(2)));
}

#[test]
fn test_container_usable_after_cycle_error() {
    let mut c = container(ContainerConfig::new());
    c.bind_self::<Chicken>().unwrap();
    c.bind_self::<Egg>().unwrap();
    c.bind_self::<Level1>().unwrap();
    c.bind_self::<Level2>().unwrap();
    c.bind_self::<Level3>().unwrap();
    c.install(&[]).unwrap();

    assert!(c.resolve::<Egg>().is_err());
    // The stack unwound cleanly, so an unrelated chain still resolves.
    assert!(c.resolve::<Level1>().is_ok());
    assert!(c.resolve::<Egg>().is_err());
}
