use std::collections::HashMap;

use crate::error::{Result, TatlError};
use crate::runtime::ComponentClass;

/// Registry mapping custom-element tag names to their classes.
///
/// Injected wherever registration happens so each document (and each test)
/// owns an isolated set of definitions.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    entries: HashMap<String, ComponentClass>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class` under its tag name. Redefining a tag fails.
    pub fn define(&mut self, class: ComponentClass) -> Result<()> {
        let tag = class.tag_name().to_ascii_lowercase();
        if self.entries.contains_key(&tag) {
            return Err(TatlError::AlreadyDefined(tag));
        }
        self.entries.insert(tag, class);
        Ok(())
    }

    pub fn already_registered(&self, tag_name: &str) -> bool {
        self.entries.contains_key(&tag_name.to_ascii_lowercase())
    }

    pub fn get(&self, tag_name: &str) -> Option<&ComponentClass> {
        self.entries.get(&tag_name.to_ascii_lowercase())
    }

    /// Registered tag names, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = self.entries.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
