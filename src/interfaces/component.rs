use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::interfaces::instance::Args;

/// A type the container knows how to build.
///
/// `dependencies` lists the constructor parameters in the order `construct`
/// pulls them out of [`Args`]. Most components get this from
/// `#[derive(Component)]`:
///
/// ```rust
/// use std::sync::Arc;
/// use wireup::{registry, Component, Container, Token};
///
/// #[derive(Component)]
/// struct Clock;
///
/// #[derive(Component)]
/// struct Scheduler {
///     clock: Arc<Clock>,
/// }
///
/// registry::global().register::<Scheduler>();
/// let scheduler = Container::new(Token::of::<Scheduler>())
///     .unwrap()
///     .compile()
///     .unwrap();
/// assert!(scheduler.cast::<Scheduler>().is_ok());
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    fn dependencies() -> Vec<Token>;

    fn construct(args: &mut Args) -> anyhow::Result<Self>;

    /// Interfaces (usually `dyn Trait`) an instance can be viewed as, in
    /// addition to its own type.
    fn exports(_exports: &mut Exports<Self>) {}
}

pub(crate) type ErasedValue = Arc<dyn Any + Send + Sync>;
pub(crate) type Cast = Arc<dyn Fn(ErasedValue) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

pub(crate) struct Export {
    pub(crate) interface: TypeId,
    pub(crate) name: &'static str,
    pub(crate) cast: Cast,
}

/// Interface views of one component type, keyed by `TypeId::of::<Arc<I>>()`.
#[derive(Default)]
pub(crate) struct ExportTable {
    entries: Vec<Export>,
}

impl ExportTable {
    pub(crate) fn find(&self, interface: TypeId) -> Option<&Export> {
        self.entries.iter().find(|e| e.interface == interface)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}

pub struct Exports<T> {
    table: ExportTable,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> Exports<T> {
    fn new() -> Self {
        let mut exports = Self {
            table: ExportTable::default(),
            _marker: PhantomData,
        };
        exports.push::<T>(Arc::new(|value: ErasedValue| {
            value
                .downcast::<T>()
                .ok()
                .map(|this| Box::new(this) as Box<dyn Any + Send + Sync>)
        }));
        exports
    }

    /// Make instances of `T` available as `Arc<I>`.
    ///
    /// ```rust,ignore
    /// exports.export::<dyn Orders>(|this| this);
    /// ```
    pub fn export<I>(&mut self, cast: fn(Arc<T>) -> Arc<I>) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.push::<I>(Arc::new(move |value: ErasedValue| {
            value
                .downcast::<T>()
                .ok()
                .map(|this| Box::new(cast(this)) as Box<dyn Any + Send + Sync>)
        }));
        self
    }

    fn push<I: ?Sized + 'static>(&mut self, cast: Cast) {
        let interface = TypeId::of::<Arc<I>>();
        if self.table.find(interface).is_none() {
            self.table.entries.push(Export {
                interface,
                name: type_name::<I>(),
                cast,
            });
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Blueprint {
    pub(crate) dependencies: fn() -> Vec<Token>,
    pub(crate) construct: fn(&mut Args) -> anyhow::Result<ErasedValue>,
    pub(crate) exports: fn() -> ExportTable,
}

fn construct_erased<T: Component>(args: &mut Args) -> anyhow::Result<ErasedValue> {
    Ok(Arc::new(T::construct(args)?))
}

fn export_table<T: Component>() -> ExportTable {
    let mut exports = Exports::<T>::new();
    T::exports(&mut exports);
    exports.table
}

/// A stable handle to a type, used wherever the container needs "a type as a
/// value": roots, overrides, lookups and dependency lists.
#[derive(Clone, Copy)]
pub struct Token {
    type_id: TypeId,
    name: &'static str,
    blueprint: Option<Blueprint>,
}

impl Token {
    pub fn of<T: Component>() -> Self {
        Token {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            blueprint: Some(Blueprint {
                dependencies: T::dependencies,
                construct: construct_erased::<T>,
                exports: export_table::<T>,
            }),
        }
    }

    /// A plain type the container cannot construct. Useful only to be
    /// rejected with [`Error::NotAComponent`](crate::Error::NotAComponent).
    pub fn of_value<T: 'static>() -> Self {
        Token {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            blueprint: None,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_component(&self) -> bool {
        self.blueprint.is_some()
    }

    pub(crate) fn blueprint(&self) -> Option<Blueprint> {
        self.blueprint
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.name).finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
