pub mod component;
pub mod instance;

pub use component::{Component, Exports, Token};
pub use instance::{Args, Instance};
