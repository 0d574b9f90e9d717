//! Process-wide component registry.
//!
//! Every component type gets a [`ComponentId`] the first time it is
//! registered. Identities are handed out by a single counter behind a mutex,
//! so they follow registration order even when several threads register at
//! once. Descriptors live in a `DashMap` and can be read without taking that
//! lock.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::interfaces::component::{Blueprint, Component, ExportTable, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub const fn new(id: usize) -> Self {
        ComponentId(id)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the registry knows about one component type.
#[derive(Clone)]
pub struct Descriptor {
    id: ComponentId,
    token: Token,
    params: Vec<Token>,
    param_ids: Vec<ComponentId>,
    blueprint: Blueprint,
    exports: Arc<ExportTable>,
}

impl Descriptor {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn name(&self) -> &'static str {
        self.token.name()
    }

    /// Constructor parameter types, in declaration order.
    pub fn params(&self) -> &[Token] {
        &self.params
    }

    pub fn param_ids(&self) -> &[ComponentId] {
        &self.param_ids
    }

    pub(crate) fn blueprint(&self) -> Blueprint {
        self.blueprint
    }

    pub(crate) fn exports(&self) -> Arc<ExportTable> {
        Arc::clone(&self.exports)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("params", &self.params)
            .field("param_ids", &self.param_ids)
            .finish()
    }
}

pub struct Registry {
    descriptors: DashMap<TypeId, Descriptor>,
    next_id: Mutex<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            descriptors: DashMap::new(),
            next_id: Mutex::new(0),
        }
    }

    /// Register `token` unless it already is, and return its identity.
    ///
    /// Constructor parameters that are not registered yet are registered
    /// too, depth-first in declaration order. The type itself is inserted
    /// before its parameters are walked, which keeps self-referencing graphs
    /// finite here; the container rejects them later.
    ///
    /// Nothing is inserted when any type in the parameter tree is not a
    /// component.
    pub fn register_if_absent(&self, token: Token) -> Result<ComponentId> {
        if !token.is_component() {
            return Err(Error::NotAComponent { name: token.name() });
        }
        if let Some(id) = self.identity_of(token) {
            return Ok(id);
        }
        let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        self.check_unregistered(token, &mut HashSet::new())?;
        self.register_locked(token, &mut next_id)
    }

    /// Typed form of [`register_if_absent`](Registry::register_if_absent).
    ///
    /// # Panics
    ///
    /// If a `dependencies()` list names a type that is not a component.
    pub fn register<T: Component>(&self) -> ComponentId {
        let token = Token::of::<T>();
        match self.register_if_absent(token) {
            Ok(id) => id,
            // `Token::of` always carries a blueprint, so only a hand-written
            // `dependencies()` listing a value token ends up here.
            Err(err) => panic!("failed to register `{}`: {err}", token.name()),
        }
    }

    /// Walk the part of the parameter tree that is not registered yet and
    /// fail on the first value token.
    fn check_unregistered(&self, token: Token, seen: &mut HashSet<TypeId>) -> Result<()> {
        let blueprint = token
            .blueprint()
            .ok_or(Error::NotAComponent { name: token.name() })?;
        if self.identity_of(token).is_some() || !seen.insert(token.type_id()) {
            return Ok(());
        }
        for param in (blueprint.dependencies)() {
            self.check_unregistered(param, seen)?;
        }
        Ok(())
    }

    fn register_locked(&self, token: Token, next_id: &mut usize) -> Result<ComponentId> {
        if let Some(id) = self.identity_of(token) {
            return Ok(id);
        }
        let blueprint = token
            .blueprint()
            .ok_or(Error::NotAComponent { name: token.name() })?;
        let params = (blueprint.dependencies)();

        let id = ComponentId(*next_id);
        *next_id += 1;
        self.descriptors.insert(
            token.type_id(),
            Descriptor {
                id,
                token,
                params: params.clone(),
                param_ids: Vec::new(),
                blueprint,
                exports: Arc::new((blueprint.exports)()),
            },
        );
        tracing::trace!(component = token.name(), %id, "registered component");

        let mut param_ids = Vec::with_capacity(params.len());
        for param in params {
            param_ids.push(self.register_locked(param, next_id)?);
        }
        if let Some(mut descriptor) = self.descriptors.get_mut(&token.type_id()) {
            descriptor.param_ids = param_ids;
        }
        Ok(id)
    }

    pub fn identity_of(&self, token: Token) -> Option<ComponentId> {
        self.descriptors.get(&token.type_id()).map(|d| d.id)
    }

    pub fn constructor_params(&self, token: Token) -> Option<Vec<Token>> {
        self.descriptors
            .get(&token.type_id())
            .map(|d| d.params.clone())
    }

    pub fn descriptor(&self, token: Token) -> Option<Descriptor> {
        self.descriptors.get(&token.type_id()).map(|d| d.clone())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry shared by the whole process.
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
