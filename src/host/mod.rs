//! Host element abstraction.
//!
//! The runtime never talks to a live DOM directly. Anything that can answer
//! attribute lookups and hand out render targets can carry a component.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::{Result, TatlError};
use crate::render::{RenderTarget, ShadowMode};

/// The element a component instance is attached to.
pub trait HostElement {
    fn tag_name(&self) -> &str;

    /// Current value of attribute `name`, `None` when it is not set.
    fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// The element's own light tree.
    fn light_root(&self) -> RenderTarget;

    /// Attach an isolated tree with the given visibility.
    fn attach_shadow(&self, mode: ShadowMode) -> Result<RenderTarget>;
}

/// In-memory element used by [`crate::Document`] and in tests.
#[derive(Debug)]
pub struct MemoryElement {
    tag_name: String,
    attributes: RefCell<BTreeMap<String, String>>,
    attributes_readable: Cell<bool>,
    light: RenderTarget,
    shadow: RefCell<Option<RenderTarget>>,
}

impl MemoryElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: RefCell::new(BTreeMap::new()),
            attributes_readable: Cell::new(true),
            light: RenderTarget::light(),
            shadow: RefCell::new(None),
        }
    }

    pub fn with_attributes<I, K, V>(tag_name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let element = Self::new(tag_name);
        for (name, value) in attributes {
            element.set_attribute(name, value);
        }
        element
    }

    /// Set an attribute, returning the previous value.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into().to_ascii_lowercase();
        self.attributes.borrow_mut().insert(name, value.into())
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .borrow_mut()
            .remove(&name.to_ascii_lowercase())
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.attributes.borrow().clone()
    }

    /// Toggle whether attribute lookups succeed. Models an element that is
    /// not yet able to answer lookups.
    pub fn set_attributes_readable(&self, readable: bool) {
        self.attributes_readable.set(readable);
    }

    /// Content of the light tree.
    pub fn inner_html(&self) -> String {
        self.light.content()
    }

    /// The attached shadow root, if any and only when it is open.
    pub fn shadow_root(&self) -> Option<RenderTarget> {
        self.shadow
            .borrow()
            .as_ref()
            .filter(|root| root.kind() == crate::render::TargetKind::Shadow(ShadowMode::Open))
            .cloned()
    }
}

impl HostElement for MemoryElement {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        if !self.attributes_readable.get() {
            return Err(TatlError::AttributeAccess {
                name: name.to_string(),
                reason: "element does not support attribute lookup".to_string(),
            });
        }
        Ok(self
            .attributes
            .borrow()
            .get(&name.to_ascii_lowercase())
            .cloned())
    }

    fn light_root(&self) -> RenderTarget {
        self.light.clone()
    }

    fn attach_shadow(&self, mode: ShadowMode) -> Result<RenderTarget> {
        let mut shadow = self.shadow.borrow_mut();
        if shadow.is_some() {
            return Err(TatlError::ShadowAttach(format!(
                "<{}> already hosts a shadow root",
                self.tag_name
            )));
        }
        let target = RenderTarget::shadow(mode);
        *shadow = Some(target.clone());
        Ok(target)
    }
}
