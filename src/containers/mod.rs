mod graph;

pub use graph::Container;
