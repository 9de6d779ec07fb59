use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::getters::GetterRegistry;
use crate::host::HostElement;
use crate::props::{PropSchema, PropSpec, attribute_name};
use crate::render::RootMode;
use crate::state::{SetterFn, SetterOverrides, StateContainer};
use crate::value::Value;

use super::RuntimeConfig;
use super::component::Component;

pub type RenderFn = Rc<dyn Fn(&Component) -> String>;
pub type HookFn = Rc<dyn Fn(&Component)>;

/// Declarative description of a component.
///
/// ```
/// use tatl::{ComponentDefinition, PropSpec, html};
///
/// let definition = ComponentDefinition::new("x-greeting")
///     .prop("name", PropSpec::text().required())
///     .render(|c| html!("<p>Hello " {c.prop("name")} "</p>"));
/// assert_eq!(definition.tag_name(), "x-greeting");
/// ```
pub struct ComponentDefinition {
    tag_name: String,
    props: PropSchema,
    state: BTreeMap<String, Value>,
    getters: GetterRegistry<Component>,
    setters: SetterOverrides,
    root: RootMode,
    render: Option<RenderFn>,
    ready: Option<HookFn>,
    removed: Option<HookFn>,
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("tag_name", &self.tag_name)
            .field("props", &self.props)
            .field("state", &self.state)
            .field("getters", &self.getters)
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("root", &self.root)
            .field("render", &self.render.is_some())
            .finish_non_exhaustive()
    }
}

impl ComponentDefinition {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            props: PropSchema::new(),
            state: BTreeMap::new(),
            getters: GetterRegistry::new(),
            setters: SetterOverrides::new(),
            root: RootMode::Standard,
            render: None,
            ready: None,
            removed: None,
        }
    }

    pub fn prop(mut self, name: impl Into<String>, spec: PropSpec) -> Self {
        self.props.insert(name, spec);
        self
    }

    /// Initial value of a state field.
    pub fn state(mut self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
        self.state.insert(name.into(), initial.into());
        self
    }

    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&Component) -> Value + 'static,
    {
        self.getters.insert(name, Rc::new(getter));
        self
    }

    /// Transform writes to state field `name`: `(state, new, old) -> stored`.
    pub fn setter<F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&StateContainer, Value, &Value) -> Value + 'static,
    {
        let setter: SetterFn = Rc::new(setter);
        self.setters.insert(name.into(), setter);
        self
    }

    pub fn root(mut self, mode: impl Into<RootMode>) -> Self {
        self.root = mode.into();
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Component) -> String + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn ready<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Component) + 'static,
    {
        self.ready = Some(Rc::new(hook));
        self
    }

    pub fn removed<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Component) + 'static,
    {
        self.removed = Some(Rc::new(hook));
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn props(&self) -> &PropSchema {
        &self.props
    }

    pub fn root_mode(&self) -> RootMode {
        self.root
    }

    pub(crate) fn initial_state(&self) -> BTreeMap<String, Value> {
        self.state.clone()
    }

    pub(crate) fn getters(&self) -> &GetterRegistry<Component> {
        &self.getters
    }

    pub(crate) fn render_fn(&self) -> Option<RenderFn> {
        self.render.clone()
    }

    pub(crate) fn ready_hook(&self) -> Option<HookFn> {
        self.ready.clone()
    }

    pub(crate) fn removed_hook(&self) -> Option<HookFn> {
        self.removed.clone()
    }
}

/// An instantiable component type produced from a [`ComponentDefinition`].
///
/// Cloning is cheap; every clone shares the same immutable definition.
#[derive(Clone)]
pub struct ComponentClass {
    definition: Rc<ComponentDefinition>,
    setters: Rc<SetterOverrides>,
    observed: Rc<Vec<String>>,
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("tag_name", &self.tag_name())
            .field("observed", &self.observed)
            .finish()
    }
}

impl ComponentClass {
    pub fn new(mut definition: ComponentDefinition) -> Self {
        definition.tag_name = definition.tag_name.to_ascii_lowercase();
        let setters = Rc::new(std::mem::take(&mut definition.setters));
        let observed = Rc::new(definition.props.observed_attributes());
        Self {
            definition: Rc::new(definition),
            setters,
            observed,
        }
    }

    pub fn tag_name(&self) -> &str {
        self.definition.tag_name()
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// Hyphenated attribute names whose mutation triggers an
    /// attribute-changed transition.
    pub fn observed_attributes(&self) -> &[String] {
        &self.observed
    }

    pub fn observes(&self, attribute: &str) -> bool {
        let attribute = attribute.to_ascii_lowercase();
        self.observed.iter().any(|name| *name == attribute)
    }

    /// Attribute name a property surfaces as.
    pub fn attribute_for(&self, property: &str) -> String {
        attribute_name(property)
    }

    pub(crate) fn setters(&self) -> Rc<SetterOverrides> {
        Rc::clone(&self.setters)
    }

    /// Construct a component instance on `host`.
    pub fn instantiate(&self, host: Rc<dyn HostElement>, config: &RuntimeConfig) -> Component {
        Component::construct(self.clone(), host, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_derives_observed_attributes() {
        let class = ComponentClass::new(
            ComponentDefinition::new("Input-Field")
                .prop("type", PropSpec::text().required())
                .prop("otherAttributes", PropSpec::object().default(serde_json::json!({})))
                .root("shadow"),
        );
        assert_eq!(class.tag_name(), "input-field");
        assert_eq!(class.observed_attributes(), ["type", "other-attributes"]);
        assert!(class.observes("Other-Attributes"));
        assert!(!class.observes("class"));
        assert_eq!(class.definition().root_mode(), RootMode::ShadowOpen);
        assert_eq!(class.attribute_for("className"), "class-name");
    }

    #[test]
    fn definition_keeps_declared_pieces() {
        let definition = ComponentDefinition::new("x-counter")
            .state("count", 0)
            .getter("double", |c| Value::from(c.state().value("count").as_f64().unwrap_or(0.0) * 2.0))
            .setter("count", |_, new, _| new)
            .render(|_| String::new());
        assert_eq!(definition.initial_state().get("count"), Some(&Value::from(0)));
        assert!(definition.getters().contains("double"));
        assert!(definition.render_fn().is_some());
        assert!(definition.ready_hook().is_none());
        assert!(definition.removed_hook().is_none());
    }
}
