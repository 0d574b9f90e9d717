use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::config::ContainerConfig;
use crate::error::{Error, Result, Role};
use crate::interfaces::component::Token;
use crate::interfaces::instance::{Args, Instance};
use crate::registry::{self, ComponentId, Registry};

/// "Wherever `from` is requested, build `to` and cache it under `to_id`."
#[derive(Debug, Clone, Copy)]
struct Override {
    from: ComponentId,
    to: Token,
    to_id: ComponentId,
}

/// Builds the object graph below a root component.
///
/// Every component reachable from the root is constructed once per
/// [`compile`](Container::compile) and shared by all of its consumers.
/// Overrides registered with [`replace`](Container::replace) redirect one
/// identity to another component for the next compile only.
///
/// ```rust
/// use std::sync::Arc;
/// use wireup::{registry, Component, Container, Token};
///
/// trait Store: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// #[derive(Component)]
/// #[component(export(dyn Store))]
/// struct Postgres;
///
/// impl Store for Postgres {
///     fn name(&self) -> &'static str { "postgres" }
/// }
///
/// #[derive(Component)]
/// #[component(export(dyn Store))]
/// struct InMemory;
///
/// impl Store for InMemory {
///     fn name(&self) -> &'static str { "memory" }
/// }
///
/// #[derive(Component)]
/// struct Api {
///     #[inject(Postgres)]
///     store: Arc<dyn Store>,
/// }
///
/// registry::global().register::<Api>();
/// registry::global().register::<InMemory>();
///
/// let api = Container::new(Token::of::<Api>())
///     .unwrap()
///     .replace(Token::of::<Postgres>(), Token::of::<InMemory>())
///     .unwrap()
///     .compile()
///     .unwrap()
///     .cast::<Api>()
///     .unwrap();
/// assert_eq!(api.store.name(), "memory");
/// ```
pub struct Container<'r> {
    registry: &'r Registry,
    root: Option<Token>,
    overrides: Vec<Override>,
    instances: HashMap<ComponentId, Instance>,
    config: ContainerConfig,
}

impl Container<'static> {
    /// A container over the process-wide registry.
    pub fn new(root: Token) -> Result<Self> {
        Self::with_registry(registry::global(), root)
    }
}

impl Default for Container<'static> {
    fn default() -> Self {
        Container::detached(registry::global())
    }
}

impl<'r> Container<'r> {
    pub fn with_registry(registry: &'r Registry, root: Token) -> Result<Self> {
        let mut container = Self::detached(registry);
        container.mount(root)?;
        Ok(container)
    }

    /// A container with no root yet; see [`mount`](Container::mount).
    pub fn detached(registry: &'r Registry) -> Self {
        Container {
            registry,
            root: None,
            overrides: Vec::new(),
            instances: HashMap::new(),
            config: ContainerConfig::default(),
        }
    }

    pub fn mount(&mut self, root: Token) -> Result<&mut Self> {
        self.identify(root, Role::Root)?;
        self.root = Some(root);
        Ok(self)
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn root(&self) -> Option<Token> {
        self.root
    }

    /// Build `to` wherever `from` is requested during the next compile.
    ///
    /// The replacement is cached under its own identity, so after compiling
    /// it is fetched with `get(to)`; `get(from)` finds nothing. When the same
    /// `from` is replaced twice, the first registration wins.
    pub fn replace(&mut self, from: Token, to: Token) -> Result<&mut Self> {
        let from_id = self.identify(from, Role::FirstArgument)?;
        let to_id = self.identify(to, Role::SecondArgument)?;
        debug!(from = from.name(), to = to.name(), "registered override");
        self.overrides.push(Override { from: from_id, to, to_id });
        Ok(self)
    }

    /// Construct the root and everything it depends on.
    ///
    /// Instances from a previous compile are dropped first, and the
    /// overrides are consumed whether or not the walk succeeds.
    pub fn compile(&mut self) -> Result<Instance> {
        let root = self.root.ok_or(Error::MissingRoot)?;
        let root_id = self.identify(root, Role::Root)?;
        debug!(
            root = root.name(),
            overrides = self.overrides.len(),
            "compiling container"
        );

        self.instances.clear();
        let mut path = Vec::new();
        let walked = self.resolve(root, &mut path);
        self.overrides.clear();
        walked?;

        let instance = self
            .instances
            .get(&root_id)
            .cloned()
            .ok_or(Error::DependencyNotFound(root_id))?;
        debug!(
            root = root.name(),
            instances = self.instances.len(),
            "container compiled"
        );
        Ok(instance)
    }

    /// The instance cached under `token`'s own identity.
    pub fn get(&self, token: Token) -> Result<Instance> {
        if self.root.is_none() {
            return Err(Error::MissingRoot);
        }
        let id = self.identify(token, Role::Lookup)?;
        self.instances
            .get(&id)
            .cloned()
            .ok_or(Error::DependencyNotFound(id))
    }

    pub fn contains(&self, token: Token) -> bool {
        self.registry
            .identity_of(token)
            .is_some_and(|id| self.instances.contains_key(&id))
    }

    /// Number of constructed instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn identify(&self, token: Token, role: Role) -> Result<ComponentId> {
        if !token.is_component() {
            return Err(Error::NotAComponent { name: token.name() });
        }
        self.registry
            .identity_of(token)
            .ok_or(Error::NotRegistered {
                role,
                name: token.name(),
            })
    }

    fn resolve(
        &mut self,
        token: Token,
        path: &mut Vec<(ComponentId, &'static str)>,
    ) -> Result<Instance> {
        let id = self.registry.register_if_absent(token)?;
        let (effective, slot) = match self.overrides.iter().find(|o| o.from == id) {
            Some(o) => (o.to, o.to_id),
            None => (token, id),
        };

        if let Some(instance) = self.instances.get(&slot) {
            trace!(component = effective.name(), id = %slot, "reusing instance");
            return Ok(instance.clone());
        }
        if self.config.detect_cycles {
            if let Some(start) = path.iter().position(|(seen, _)| *seen == slot) {
                return Err(Error::CyclicDependency {
                    path: render_cycle(&path[start..], effective.name()),
                });
            }
        }
        if path.len() >= self.config.max_depth {
            return Err(Error::MaxDepthExceeded {
                depth: path.len() + 1,
                limit: self.config.max_depth,
            });
        }

        let descriptor = self
            .registry
            .descriptor(effective)
            .ok_or(Error::NotRegistered {
                role: Role::Dependency,
                name: effective.name(),
            })?;

        path.push((slot, descriptor.name()));
        let mut args = Vec::with_capacity(descriptor.params().len());
        for param in descriptor.params() {
            args.push(self.resolve(*param, path)?);
        }
        path.pop();

        let construct = descriptor.blueprint().construct;
        let value = construct(&mut Args::new(descriptor.name(), args)).map_err(|err| {
            // Argument errors raised by the container itself come back as-is.
            match err.downcast::<Error>() {
                Ok(own) => own,
                Err(other) => Error::Construction(other),
            }
        })?;
        trace!(component = descriptor.name(), id = %slot, "constructed instance");

        let instance = Instance::new(descriptor.name(), value, descriptor.exports());
        self.instances.insert(slot, instance.clone());
        Ok(instance)
    }
}

fn render_cycle(path: &[(ComponentId, &'static str)], again: &'static str) -> String {
    let mut names: Vec<&str> = path.iter().map(|(_, name)| *name).collect();
    names.push(again);
    names.join(" -> ")
}

impl fmt::Debug for Container<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("root", &self.root)
            .field("overrides", &self.overrides)
            .field("instances", &self.instances.len())
            .field("config", &self.config)
            .finish()
    }
}
