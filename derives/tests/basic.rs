use std::sync::Arc;

use wireup::{Component, Container, Registry, Token};

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

trait Farewell: Send + Sync {
    fn bye(&self) -> &'static str;
}

#[derive(Component)]
#[component(export(dyn Greeter), export(dyn Farewell))]
struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

impl Farewell for English {
    fn bye(&self) -> &'static str {
        "goodbye"
    }
}

#[derive(Component)]
struct Dependency;

#[derive(Component)]
struct SimpleService {
    dependency: Arc<Dependency>,
    #[inject(English)]
    greeter: Arc<dyn Greeter>,
}

#[derive(Component)]
struct TupleService(Arc<Dependency>, #[inject(English)] Arc<dyn Farewell>);

#[derive(Component)]
struct QualifiedPath {
    _dependency: std::sync::Arc<Dependency>,
}

#[test]
fn unit_struct_has_no_dependencies() {
    assert!(<Dependency as Component>::dependencies().is_empty());
}

#[test]
fn fields_become_dependencies_in_order() {
    assert_eq!(
        <SimpleService as Component>::dependencies(),
        vec![Token::of::<Dependency>(), Token::of::<English>()]
    );
    assert_eq!(
        <TupleService as Component>::dependencies(),
        vec![Token::of::<Dependency>(), Token::of::<English>()]
    );
    assert_eq!(
        <QualifiedPath as Component>::dependencies(),
        vec![Token::of::<Dependency>()]
    );
}

#[test]
fn derived_components_are_wired_together() {
    let registry = Registry::new();
    registry.register::<SimpleService>();
    registry.register::<TupleService>();

    let mut container = Container::with_registry(&registry, Token::of::<SimpleService>()).unwrap();
    let service = container.compile().unwrap().cast::<SimpleService>().unwrap();
    assert_eq!(service.greeter.greet(), "hello");

    let dependency = container.get(Token::of::<Dependency>()).unwrap();
    assert!(Arc::ptr_eq(&dependency.cast::<Dependency>().unwrap(), &service.dependency));

    let mut container = Container::with_registry(&registry, Token::of::<TupleService>()).unwrap();
    let tuple = container.compile().unwrap().cast::<TupleService>().unwrap();
    assert_eq!(tuple.1.bye(), "goodbye");
    let dependency = container.get(Token::of::<Dependency>()).unwrap();
    assert!(Arc::ptr_eq(&dependency.cast::<Dependency>().unwrap(), &tuple.0));
}

#[test]
fn exported_interfaces_are_castable() {
    let registry = Registry::new();
    registry.register::<English>();

    let mut container = Container::with_registry(&registry, Token::of::<English>()).unwrap();
    let english = container.compile().unwrap();
    assert_eq!(english.cast::<dyn Greeter>().unwrap().greet(), "hello");
    assert_eq!(english.cast::<dyn Farewell>().unwrap().bye(), "goodbye");
    assert!(english.cast::<Dependency>().is_err());
}
