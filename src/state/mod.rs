//! Reactive state container.
//!
//! State is only reachable through [`StateContainer::get`] and
//! [`StateContainer::set`]. A write that changes a field runs the optional
//! setter override, stores the result and then notifies the observer, which
//! for a live component means one full render pass.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Setter override: `(state, new_value, old_value) -> stored_value`.
pub type SetterFn = Rc<dyn Fn(&StateContainer, Value, &Value) -> Value>;

pub type SetterOverrides = BTreeMap<String, SetterFn>;

/// Result of a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The field already held an equal value; nothing happened.
    Unchanged,
    /// The value (possibly transformed by an override) was stored.
    Stored,
}

/// Receives write notifications from a [`StateContainer`].
pub trait StateObserver {
    /// A write was stored. Called after the value is in place.
    fn written(&self, key: &str);

    /// A write was skipped because the value was unchanged.
    fn ignored(&self, _key: &str) {}
}

pub struct StateContainer {
    fields: RefCell<BTreeMap<String, Value>>,
    setters: Rc<SetterOverrides>,
    observer: RefCell<Option<Rc<dyn StateObserver>>>,
}

impl fmt::Debug for StateContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContainer")
            .field("fields", &self.fields.borrow())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl StateContainer {
    pub fn new(initial: BTreeMap<String, Value>, setters: Rc<SetterOverrides>) -> Self {
        Self {
            fields: RefCell::new(initial),
            setters,
            observer: RefCell::new(None),
        }
    }

    /// Install the observer notified on writes, replacing any previous one.
    pub fn observe(&self, observer: Rc<dyn StateObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields.borrow().get(key).cloned()
    }

    /// Like [`get`](Self::get) but yields `Null` for unknown fields.
    pub fn value(&self, key: &str) -> Value {
        self.get(key).unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// Copy of every field.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.fields.borrow().clone()
    }

    /// Write `key`. Equal values are ignored; anything else runs the
    /// override for `key` if declared, stores, and notifies the observer.
    ///
    /// No borrow is held while the override or the observer runs, so both
    /// may read or write state again.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> WriteOutcome {
        let value = value.into();
        let current = self.get(key);

        if current.as_ref() == Some(&value) {
            if let Some(observer) = self.current_observer() {
                observer.ignored(key);
            }
            return WriteOutcome::Unchanged;
        }

        let stored = match self.setters.get(key) {
            Some(setter) => {
                let previous = current.unwrap_or_default();
                setter(self, value, &previous)
            }
            None => value,
        };
        self.fields.borrow_mut().insert(key.to_string(), stored);

        if let Some(observer) = self.current_observer() {
            observer.written(key);
        }
        WriteOutcome::Stored
    }

    fn current_observer(&self) -> Option<Rc<dyn StateObserver>> {
        self.observer.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        written: Cell<usize>,
        ignored: Cell<usize>,
    }

    impl StateObserver for Counter {
        fn written(&self, _key: &str) {
            self.written.set(self.written.get() + 1);
        }

        fn ignored(&self, _key: &str) {
            self.ignored.set(self.ignored.get() + 1);
        }
    }

    fn container(setters: SetterOverrides) -> (StateContainer, Rc<Counter>) {
        let mut initial = BTreeMap::new();
        initial.insert("count".to_string(), Value::from(1));
        initial.insert("name".to_string(), Value::from("ada"));
        let state = StateContainer::new(initial, Rc::new(setters));
        let counter = Rc::new(Counter::default());
        state.observe(counter.clone());
        (state, counter)
    }

    #[test]
    fn equal_writes_do_not_notify() {
        let (state, counter) = container(SetterOverrides::new());
        assert_eq!(state.set("count", 1), WriteOutcome::Unchanged);
        assert_eq!(counter.written.get(), 0);
        assert_eq!(counter.ignored.get(), 1);

        assert_eq!(state.set("count", 2), WriteOutcome::Stored);
        assert_eq!(counter.written.get(), 1);
        assert_eq!(state.value("count"), Value::from(2));
    }

    #[test]
    fn new_fields_are_stored() {
        let (state, counter) = container(SetterOverrides::new());
        assert!(!state.contains("fresh"));
        assert_eq!(state.set("fresh", Value::Null), WriteOutcome::Stored);
        assert!(state.contains("fresh"));
        assert_eq!(counter.written.get(), 1);
    }

    #[test]
    fn nan_writes_always_store() {
        let (state, counter) = container(SetterOverrides::new());
        state.set("count", Value::nan());
        state.set("count", Value::nan());
        assert_eq!(counter.written.get(), 2);
    }

    #[test]
    fn override_receives_new_and_previous_value() {
        let mut setters = SetterOverrides::new();
        let clamp: SetterFn = Rc::new(|state: &StateContainer, new: Value, old: &Value| {
            let ceiling = state.value("name").as_str().map_or(0.0, |n| n.len() as f64);
            match (new.as_f64(), old.as_f64()) {
                (Some(n), Some(o)) if n > ceiling => Value::from(o),
                _ => new,
            }
        });
        setters.insert("count".to_string(), clamp);
        let (state, counter) = container(setters);

        state.set("count", 2);
        assert_eq!(state.value("count"), Value::from(2));

        // Clamped back to the previous value, yet still a stored write.
        assert_eq!(state.set("count", 10), WriteOutcome::Stored);
        assert_eq!(state.value("count"), Value::from(2));
        assert_eq!(counter.written.get(), 2);
    }

    #[test]
    fn override_may_write_other_fields() {
        let mut setters = SetterOverrides::new();
        let track: SetterFn = Rc::new(|state: &StateContainer, new: Value, _old: &Value| {
            state.set("name", format!("renamed-{new}"));
            new
        });
        setters.insert("count".to_string(), track);
        let (state, counter) = container(setters);

        state.set("count", 5);
        assert_eq!(state.value("name"), Value::from("renamed-5"));
        assert_eq!(counter.written.get(), 2);
    }
}
