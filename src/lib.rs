//! Dependency injection by graph resolution.
//!
//! Register a root [`Component`], hand it to a [`Container`] and `compile`:
//! the container walks the constructor parameters depth-first, builds every
//! component once and shares it with all consumers. [`Container::replace`]
//! swaps one component for another before compiling, which is how tests put
//! mocks under a real object graph.
//!
//! ```rust
//! use std::sync::Arc;
//! use wireup::{registry, Component, Container, Token};
//!
//! #[derive(Component)]
//! struct Products;
//!
//! impl Products {
//!     fn list(&self) -> Vec<&'static str> {
//!         vec!["product 1", "product 2", "product 3"]
//!     }
//! }
//!
//! #[derive(Component)]
//! struct Orders {
//!     products: Arc<Products>,
//! }
//!
//! registry::global().register::<Orders>();
//!
//! let mut container = Container::new(Token::of::<Orders>()).unwrap();
//! let orders = container.compile().unwrap().cast::<Orders>().unwrap();
//! assert_eq!(orders.products.list().len(), 3);
//!
//! let products = container.get(Token::of::<Products>()).unwrap();
//! assert!(Arc::ptr_eq(&products.cast::<Products>().unwrap(), &orders.products));
//! ```

extern crate self as wireup;

pub mod config;
pub mod containers;
pub mod error;
pub mod interfaces;
pub mod registry;

pub use config::{ConfigError, ContainerConfig};
pub use containers::Container;
pub use error::{Error, Result, Role};
pub use interfaces::{Args, Component, Exports, Instance, Token};
pub use registry::{ComponentId, Descriptor, Registry};
pub use wireup_derive::Component;

#[doc(hidden)]
pub use anyhow;
