//! Computed getters.
//!
//! A getter is a named zero-argument computation evaluated against its owner
//! (for components, the live [`crate::Component`]). Nothing is cached: each
//! access calls the function again with the owner's current props and state.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

pub type GetterFn<C> = Rc<dyn Fn(&C) -> Value>;

pub struct GetterRegistry<C> {
    getters: BTreeMap<String, GetterFn<C>>,
}

impl<C> Default for GetterRegistry<C> {
    fn default() -> Self {
        Self {
            getters: BTreeMap::new(),
        }
    }
}

impl<C> Clone for GetterRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            getters: self.getters.clone(),
        }
    }
}

impl<C> fmt::Debug for GetterRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.getters.keys()).finish()
    }
}

impl<C> GetterRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, getter: GetterFn<C>) {
        self.getters.insert(name.into(), getter);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.getters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// Run getter `name` against `owner`. `None` when no such getter exists.
    pub fn evaluate(&self, name: &str, owner: &C) -> Option<Value> {
        // Clone the handle so the getter may re-enter the registry.
        let getter = self.getters.get(name)?.clone();
        Some(getter(owner))
    }

    /// Bind the registry to an owner for repeated lookups.
    pub fn bind<'a>(&'a self, owner: &'a C) -> Getters<'a, C> {
        Getters {
            registry: self,
            owner,
        }
    }
}

/// A registry bound to its owner, the `get` namespace seen by render code.
pub struct Getters<'a, C> {
    registry: &'a GetterRegistry<C>,
    owner: &'a C,
}

impl<C> Getters<'_, C> {
    pub fn get(&self, name: &str) -> Option<Value> {
        self.registry.evaluate(name, self.owner)
    }

    /// Like [`get`](Self::get) but yields `Null` for unknown getters.
    pub fn value(&self, name: &str) -> Value {
        self.get(name).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
