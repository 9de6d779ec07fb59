//! In-memory document that drives components through their lifecycle.
//!
//! Host mutations (creating, attaching, removing elements and touching their
//! attributes) are translated into the controller's transitions, the way a
//! browser's custom-element dispatcher would.

use std::rc::Rc;

use serde_json::json;

use crate::error::{Result, TatlError};
use crate::host::{HostElement, MemoryElement};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::props::attribute_name;
use crate::registry::ElementRegistry;
use crate::value::Value;

use super::component::Component;
use super::definition::{ComponentClass, ComponentDefinition};
use super::{RuntimeConfig, define};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Scripted host mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Append(ElementId),
    Remove(ElementId),
    SetAttribute {
        element: ElementId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        element: ElementId,
        name: String,
    },
    SetProperty {
        element: ElementId,
        property: String,
        value: Value,
    },
}

struct Node {
    element: Rc<MemoryElement>,
    component: Option<Component>,
    connected: bool,
}

pub struct Document {
    registry: ElementRegistry,
    config: RuntimeConfig,
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_registry(ElementRegistry::new(), config)
    }

    pub fn with_registry(registry: ElementRegistry, config: RuntimeConfig) -> Self {
        Self {
            registry,
            config,
            nodes: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Register a definition and upgrade elements already created with its
    /// tag name, connecting those that are attached.
    pub fn define(&mut self, definition: ComponentDefinition) -> Result<ComponentClass> {
        let class = define(definition, Some(&mut self.registry))?;

        let pending: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.component.is_none() && node.element.tag_name() == class.tag_name())
            .map(|(index, _)| index)
            .collect();

        for index in pending {
            let component = class.instantiate(self.nodes[index].element.clone(), &self.config);
            self.nodes[index].component = Some(component.clone());
            self.log(
                "element_upgraded",
                [
                    json_kv("tag", json!(class.tag_name())),
                    json_kv("element", json!(index)),
                ],
            );
            if self.nodes[index].connected {
                component.connected_callback();
            }
        }

        Ok(class)
    }

    pub fn create_element(&mut self, tag_name: &str) -> ElementId {
        self.insert(MemoryElement::new(tag_name))
    }

    /// Create an element whose attributes are present before construction,
    /// as with parsed markup.
    pub fn create_element_with<I, K, V>(&mut self, tag_name: &str, attributes: I) -> ElementId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(MemoryElement::with_attributes(tag_name, attributes))
    }

    fn insert(&mut self, element: MemoryElement) -> ElementId {
        let element = Rc::new(element);
        let component = self
            .registry
            .get(element.tag_name())
            .map(|class| class.instantiate(element.clone(), &self.config));
        self.nodes.push(Node {
            element,
            component,
            connected: false,
        });
        ElementId(self.nodes.len() - 1)
    }

    /// Attach an element to the document.
    pub fn append(&mut self, id: ElementId) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.connected {
            return Ok(());
        }
        node.connected = true;
        if let Some(component) = node.component.clone() {
            component.connected_callback();
        }
        Ok(())
    }

    /// Detach an element from the document.
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.connected {
            return Ok(());
        }
        node.connected = false;
        if let Some(component) = node.component.clone() {
            component.disconnected_callback();
        }
        Ok(())
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let node = self.node(id)?;
        let old_value = node.element.set_attribute(name, value);
        if let Some(component) = Self::observing(node, name) {
            component.attribute_changed_callback(name, old_value.as_deref(), Some(value));
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Result<()> {
        let node = self.node(id)?;
        let Some(old_value) = node.element.remove_attribute(name) else {
            return Ok(());
        };
        if let Some(component) = Self::observing(node, name) {
            component.attribute_changed_callback(name, Some(&old_value), None);
        }
        Ok(())
    }

    /// Set a typed property through its hyphenated attribute. `Null`
    /// removes the attribute.
    pub fn set_property(&mut self, id: ElementId, property: &str, value: &Value) -> Result<()> {
        let attribute = attribute_name(property);
        match value.to_attribute() {
            Some(wire) => self.set_attribute(id, &attribute, &wire),
            None => self.remove_attribute(id, &attribute),
        }
    }

    pub fn element(&self, id: ElementId) -> Result<Rc<MemoryElement>> {
        Ok(self.node(id)?.element.clone())
    }

    pub fn component(&self, id: ElementId) -> Option<Component> {
        self.nodes.get(id.0).and_then(|node| node.component.clone())
    }

    pub fn is_connected(&self, id: ElementId) -> bool {
        self.nodes.get(id.0).is_some_and(|node| node.connected)
    }

    /// What the element currently displays: its component's render target
    /// when upgraded, otherwise its light tree.
    pub fn content(&self, id: ElementId) -> Result<String> {
        let node = self.node(id)?;
        Ok(match &node.component {
            Some(component) => component.render_target().content(),
            None => node.element.inner_html(),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply a sequence of mutations in order, stopping at the first error.
    pub fn run_scripted<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = DocumentEvent>,
    {
        for event in events {
            match event {
                DocumentEvent::Append(id) => self.append(id)?,
                DocumentEvent::Remove(id) => self.remove(id)?,
                DocumentEvent::SetAttribute {
                    element,
                    name,
                    value,
                } => self.set_attribute(element, &name, &value)?,
                DocumentEvent::RemoveAttribute { element, name } => {
                    self.remove_attribute(element, &name)?
                }
                DocumentEvent::SetProperty {
                    element,
                    property,
                    value,
                } => self.set_property(element, &property, &value)?,
            }
        }
        self.config.emit_metrics();
        Ok(())
    }

    fn observing<'a>(node: &'a Node, attribute: &str) -> Option<&'a Component> {
        node.component
            .as_ref()
            .filter(|component| component.class().observes(attribute))
    }

    fn node(&self, id: ElementId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(TatlError::ElementNotFound(id.0))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(TatlError::ElementNotFound(id.0))
    }

    fn log<I>(&self, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(LogLevel::Debug, "tatl::lifecycle", message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html;
    use crate::logging::{Logger, MemorySink};
    use crate::props::PropSpec;
    use crate::runtime::audit::{AuditLog, AuditStage};
    use serde_json::json as j;
    use std::cell::Cell;
    use std::sync::Arc;

    fn document() -> (Document, Arc<MemorySink>, Arc<AuditLog>) {
        let sink = Arc::new(MemorySink::new());
        let audit = Arc::new(AuditLog::new());
        let mut config = RuntimeConfig::quiet()
            .with_logger(Logger::from_arc(sink.clone()))
            .with_audit(audit.clone());
        config.enable_metrics();
        (Document::new(config), sink, audit)
    }

    fn field() -> ComponentDefinition {
        ComponentDefinition::new("input-field")
            .prop("id", PropSpec::text().required())
            .prop("required", PropSpec::boolean().default(false))
            .prop("otherAttributes", PropSpec::object().default(j!({})))
            .getter("requiredAttribute", |c| {
                Value::from(if c.prop("required") == Value::Bool(true) { " required" } else { "" })
            })
            .getter("extra", |c| {
                let rendered = c
                    .prop("otherAttributes")
                    .as_object()
                    .and_then(|o| o.as_object())
                    .map(|map| {
                        map.iter()
                            .map(|(k, v)| format!(" {k}=\"{}\"", v.as_str().unwrap_or_default()))
                            .collect::<String>()
                    })
                    .unwrap_or_default();
                Value::from(rendered)
            })
            .render(|c| {
                html!("<input id=\"" {c.prop("id")} "\"" {c.get("requiredAttribute")} {c.get("extra")} "/>")
            })
    }

    #[test]
    fn markup_lifecycle_round_trip() {
        let (mut doc, _sink, audit) = document();
        doc.define(field()).unwrap();
        let id = doc.create_element_with("input-field", [("id", "name")]);
        assert_eq!(doc.content(id).unwrap(), "");

        doc.run_scripted([
            DocumentEvent::Append(id),
            DocumentEvent::SetAttribute {
                element: id,
                name: "required".into(),
                value: "true".into(),
            },
            DocumentEvent::SetProperty {
                element: id,
                property: "otherAttributes".into(),
                value: Value::from(j!({"placeholder": "Name"})),
            },
        ])
        .unwrap();

        assert_eq!(
            doc.content(id).unwrap(),
            "<input id=\"name\" required placeholder=\"Name\"/>"
        );
        assert_eq!(
            doc.element(id).unwrap().attribute("other-attributes").unwrap().as_deref(),
            Some(r#"{"placeholder":"Name"}"#)
        );
        assert_eq!(audit.count(AuditStage::RenderCommitted), 3);
        assert_eq!(audit.count(AuditStage::AttributeChanged), 2);
    }

    #[test]
    fn unobserved_attributes_do_not_dispatch() {
        let (mut doc, _sink, audit) = document();
        doc.define(field()).unwrap();
        let id = doc.create_element_with("input-field", [("id", "a")]);
        doc.append(id).unwrap();
        doc.set_attribute(id, "class", "wide").unwrap();
        doc.remove_attribute(id, "never-set").unwrap();
        assert_eq!(audit.count(AuditStage::AttributeChanged), 0);
        assert_eq!(audit.count(AuditStage::RenderCommitted), 1);
    }

    #[test]
    fn removal_disconnects_and_reappend_reconnects() {
        let (mut doc, _sink, audit) = document();
        let removed = Rc::new(Cell::new(0));
        let seen = removed.clone();
        doc.define(field().removed(move |_| seen.set(seen.get() + 1))).unwrap();
        let id = doc.create_element_with("input-field", [("id", "a")]);

        doc.append(id).unwrap();
        doc.remove(id).unwrap();
        doc.remove(id).unwrap();
        assert!(!doc.is_connected(id));
        assert_eq!(removed.get(), 1);

        doc.append(id).unwrap();
        assert_eq!(audit.count(AuditStage::Connected), 2);
        assert_eq!(audit.count(AuditStage::RenderCommitted), 2);
    }

    #[test]
    fn define_upgrades_existing_elements() {
        let (mut doc, _sink, _audit) = document();
        let id = doc.create_element_with("input-field", [("id", "late")]);
        doc.append(id).unwrap();
        assert!(doc.component(id).is_none());

        doc.define(field()).unwrap();
        assert!(doc.component(id).is_some());
        assert_eq!(doc.content(id).unwrap(), "<input id=\"late\"/>");
    }

    #[test]
    fn attribute_changes_fire_while_disconnected() {
        let (mut doc, _sink, audit) = document();
        doc.define(field()).unwrap();
        let id = doc.create_element_with("input-field", [("id", "a")]);
        doc.set_attribute(id, "id", "b").unwrap();
        assert_eq!(audit.count(AuditStage::AttributeChanged), 1);
        assert_eq!(doc.content(id).unwrap(), "<input id=\"b\"/>");
        assert_eq!(doc.component(id).unwrap().prop("id"), Value::from("b"));
    }

    #[test]
    fn redefinition_and_unknown_elements_fail() {
        let (mut doc, _sink, _audit) = document();
        doc.define(field()).unwrap();
        assert!(matches!(
            doc.define(field()),
            Err(TatlError::AlreadyDefined(_))
        ));
        assert!(matches!(
            doc.append(ElementId(99)),
            Err(TatlError::ElementNotFound(99))
        ));
    }

    #[test]
    fn missing_required_id_is_logged() {
        let (mut doc, sink, _audit) = document();
        doc.define(field()).unwrap();
        let id = doc.create_element("input-field");
        doc.append(id).unwrap();

        assert_eq!(doc.content(id).unwrap(), "<input id=\"\"/>");
        let errors = sink.events_at(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("attribute"), Some(&j!("id")));
    }
}
