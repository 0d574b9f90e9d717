#![allow(dead_code)]

use std::sync::Arc;

use wireup::{registry, Component};

pub trait ProductCatalog: Send + Sync {
    fn get_products(&self) -> Vec<String>;
}

pub trait OrderBook: Send + Sync {
    fn get_orders_for_user(&self) -> Vec<String>;
}

#[derive(Component)]
#[component(export(dyn ProductCatalog))]
pub struct ProductService;

impl ProductCatalog for ProductService {
    fn get_products(&self) -> Vec<String> {
        vec!["product 1".into(), "product 2".into(), "product 3".into()]
    }
}

#[derive(Component)]
#[component(export(dyn ProductCatalog))]
pub struct ProductServiceMock;

impl ProductCatalog for ProductServiceMock {
    fn get_products(&self) -> Vec<String> {
        vec!["product 99".into(), "product 98".into(), "product 97".into()]
    }
}

#[derive(Component)]
#[component(export(dyn OrderBook))]
pub struct OrderService {
    #[inject(ProductService)]
    product_service: Arc<dyn ProductCatalog>,
}

impl OrderBook for OrderService {
    fn get_orders_for_user(&self) -> Vec<String> {
        self.product_service.get_products()
    }
}

#[derive(Component)]
#[component(export(dyn OrderBook))]
pub struct OrderServiceMock {
    #[inject(ProductServiceMock)]
    product_service: Arc<dyn ProductCatalog>,
}

impl OrderBook for OrderServiceMock {
    fn get_orders_for_user(&self) -> Vec<String> {
        self.product_service.get_products()
    }
}

#[derive(Component)]
pub struct UserService {
    #[inject(OrderService)]
    order_service: Arc<dyn OrderBook>,
}

impl UserService {
    pub fn get_user_orders(&self) -> Vec<String> {
        self.order_service.get_orders_for_user()
    }
}

pub fn real_products() -> Vec<String> {
    vec!["product 1".into(), "product 2".into(), "product 3".into()]
}

pub fn mock_products() -> Vec<String> {
    vec!["product 99".into(), "product 98".into(), "product 97".into()]
}

/// Registers the user/order/product components and their mocks.
pub fn register_services() {
    let registry = registry::global();
    registry.register::<UserService>();
    registry.register::<OrderServiceMock>();
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("wireup=trace"))
        .with_test_writer()
        .try_init();
}
