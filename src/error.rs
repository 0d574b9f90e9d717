use std::fmt;

use crate::registry::ComponentId;

/// The position a token was supplied in when it failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    FirstArgument,
    SecondArgument,
    Lookup,
    Dependency,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Role::Root => "the root component",
            Role::FirstArgument => "the first argument",
            Role::SecondArgument => "the second argument",
            Role::Lookup => "the provided component",
            Role::Dependency => "the dependency",
        };
        f.write_str(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{name}` is not a component: the container supports component types only")]
    NotAComponent { name: &'static str },

    #[error("{role} `{name}` must be registered as a component")]
    NotRegistered { role: Role, name: &'static str },

    #[error("need a root component before resolving")]
    MissingRoot,

    #[error("Dependency {0} is not found")]
    DependencyNotFound(ComponentId),

    #[error("cyclic dependency detected: {path}")]
    CyclicDependency { path: String },

    #[error("resolution depth {depth} exceeds the configured limit of {limit}")]
    MaxDepthExceeded { depth: usize, limit: usize },

    #[error("`{component}` expects an argument at position {position} but none was resolved")]
    MissingArgument {
        component: &'static str,
        position: usize,
    },

    #[error("`{component}` does not export `{interface}`")]
    NotExported {
        component: &'static str,
        interface: &'static str,
    },

    /// A component constructor failed; its error is passed through untouched.
    #[error(transparent)]
    Construction(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
