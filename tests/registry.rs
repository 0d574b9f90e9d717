mod common;

use std::sync::Arc;

use common::*;
use wireup::{registry, Component, Registry, Token};

#[test]
fn identities_are_idempotent() {
    let registry = registry::global();
    let first = registry.register::<UserService>();
    for _ in 0..3 {
        assert_eq!(registry.register::<UserService>(), first);
        assert_eq!(
            registry.register_if_absent(Token::of::<UserService>()).unwrap(),
            first
        );
    }
    assert_eq!(registry.identity_of(Token::of::<UserService>()), Some(first));
}

#[test]
fn later_registrations_get_larger_identities() {
    #[derive(Component)]
    struct First;

    #[derive(Component)]
    struct Second;

    let registry = registry::global();
    let first = registry.register::<First>();
    let second = registry.register::<Second>();
    assert!(second > first);
}

#[test]
fn constructor_params_keep_declaration_order() {
    #[derive(Component)]
    struct Alpha;

    #[derive(Component)]
    struct Beta;

    #[derive(Component)]
    struct Gamma {
        _beta: Arc<Beta>,
        _alpha: Arc<Alpha>,
    }

    let registry = Registry::new();
    registry.register::<Gamma>();

    assert_eq!(
        registry.constructor_params(Token::of::<Gamma>()).unwrap(),
        vec![Token::of::<Beta>(), Token::of::<Alpha>()]
    );
    assert!(registry.constructor_params(Token::of::<Alpha>()).unwrap().is_empty());

    let gamma = registry.descriptor(Token::of::<Gamma>()).unwrap();
    assert_eq!(gamma.id().get(), 0);
    let ids: Vec<usize> = gamma.param_ids().iter().map(|id| id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn services_are_registered_transitively() {
    register_services();
    let registry = registry::global();
    for token in [
        Token::of::<UserService>(),
        Token::of::<OrderService>(),
        Token::of::<ProductService>(),
        Token::of::<OrderServiceMock>(),
        Token::of::<ProductServiceMock>(),
    ] {
        assert!(registry.identity_of(token).is_some(), "{token} is not registered");
    }
}
