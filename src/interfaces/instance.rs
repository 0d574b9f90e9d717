use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::interfaces::component::{ErasedValue, ExportTable};

/// A constructed component, shared by every consumer that depends on it.
#[derive(Clone)]
pub struct Instance {
    name: &'static str,
    value: ErasedValue,
    exports: Arc<ExportTable>,
}

impl Instance {
    pub(crate) fn new(name: &'static str, value: ErasedValue, exports: Arc<ExportTable>) -> Self {
        Instance {
            name,
            value,
            exports,
        }
    }

    /// Type name of the component that was actually constructed.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// View the instance as `Arc<T>`, where `T` is either the component type
    /// itself or one of the interfaces it exports.
    pub fn cast<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let not_exported = || Error::NotExported {
            component: self.name,
            interface: type_name::<T>(),
        };
        let export = self
            .exports
            .find(TypeId::of::<Arc<T>>())
            .ok_or_else(not_exported)?;
        let viewed = (export.cast)(Arc::clone(&self.value)).ok_or_else(not_exported)?;
        viewed
            .downcast::<Arc<T>>()
            .map(|arc| *arc)
            .map_err(|_| not_exported())
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Whether both handles point at the same constructed value.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("component", &self.name)
            .field("exports", &self.exports.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolved constructor arguments, handed out in declaration order.
pub struct Args {
    component: &'static str,
    position: usize,
    items: std::vec::IntoIter<Instance>,
}

impl Args {
    pub(crate) fn new(component: &'static str, items: Vec<Instance>) -> Self {
        Args {
            component,
            position: 0,
            items: items.into_iter(),
        }
    }

    /// Take the next argument as `Arc<T>`.
    pub fn next<T>(&mut self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let position = self.position;
        self.position += 1;
        let instance = self.items.next().ok_or(Error::MissingArgument {
            component: self.component,
            position,
        })?;
        instance.cast::<T>()
    }

    /// Take the next argument without viewing it as a particular type.
    pub fn next_instance(&mut self) -> Result<Instance> {
        let position = self.position;
        self.position += 1;
        self.items.next().ok_or(Error::MissingArgument {
            component: self.component,
            position,
        })
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::component::{Component, Exports, Token};

    trait Named: Send + Sync {
        fn label(&self) -> String;
    }

    #[derive(Debug)]
    struct Widget(u8);

    impl Named for Widget {
        fn label(&self) -> String {
            format!("widget {}", self.0)
        }
    }

    impl Component for Widget {
        fn dependencies() -> Vec<Token> {
            Vec::new()
        }

        fn construct(_args: &mut Args) -> anyhow::Result<Self> {
            Ok(Widget(7))
        }

        fn exports(exports: &mut Exports<Self>) {
            exports.export::<dyn Named>(|this| this);
        }
    }

    fn widget() -> Instance {
        let blueprint = Token::of::<Widget>().blueprint().unwrap();
        let value = (blueprint.construct)(&mut Args::new("Widget", Vec::new())).unwrap();
        Instance::new("Widget", value, Arc::new((blueprint.exports)()))
    }

    #[test]
    fn cast_to_self_and_interface() {
        let instance = widget();
        assert_eq!(instance.cast::<Widget>().unwrap().0, 7);
        assert_eq!(instance.cast::<dyn Named>().unwrap().label(), "widget 7");
        assert!(instance.is::<Widget>());
    }

    #[test]
    fn cast_to_unexported_type_fails() {
        let err = widget().cast::<String>().unwrap_err();
        assert!(matches!(err, Error::NotExported { component: "Widget", .. }));
    }

    #[test]
    fn clones_share_the_value() {
        let a = widget();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&widget()));
    }

    #[test]
    fn args_are_positional() {
        let mut args = Args::new("Pair", vec![widget()]);
        assert_eq!(args.remaining(), 1);
        assert!(args.next::<Widget>().is_ok());
        let err = args.next::<Widget>().unwrap_err();
        assert!(matches!(err, Error::MissingArgument { component: "Pair", position: 1 }));
    }
}
