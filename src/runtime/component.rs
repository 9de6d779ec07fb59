use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::json;

use crate::getters::Getters;
use crate::host::HostElement;
use crate::logging::json_kv;
use crate::props::{Diagnostic, ResolvedProps};
use crate::render::{RenderTarget, resolve_root};
use crate::state::{StateContainer, StateObserver};
use crate::value::Value;

use super::RuntimeConfig;
use super::audit::{AuditEventBuilder, AuditStage};
use super::definition::ComponentClass;

/// Where an instance is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructed,
    Connected,
    Disconnected,
}

/// Host lifecycle notifications, as delivered by an adapter such as
/// [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connected,
    AttributeChanged {
        name: String,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The render target's content was replaced.
    Committed,
    /// No render function or empty markup; the target was left untouched.
    Skipped,
}

/// A live component instance: the lifecycle controller.
///
/// Cheap to clone; clones are handles to the same instance. Render
/// functions, getters and hooks receive `&Component` and read `props`,
/// `state` and getters through it.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

struct ComponentInner {
    class: ComponentClass,
    host: Rc<dyn HostElement>,
    props: RefCell<Rc<ResolvedProps>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
    state: StateContainer,
    target: RenderTarget,
    lifecycle: Cell<LifecycleState>,
    config: RuntimeConfig,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("tag_name", &self.tag_name())
            .field("lifecycle", &self.lifecycle())
            .field("props", &self.props())
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

/// Re-renders its component whenever state is stored.
struct RenderOnWrite {
    component: Weak<ComponentInner>,
}

impl StateObserver for RenderOnWrite {
    fn written(&self, key: &str) {
        let Some(inner) = self.component.upgrade() else {
            return;
        };
        let component = Component { inner };
        component.with_metrics(|metrics| metrics.record_state_write());
        component.audit(AuditStage::StateWritten, [json_kv("field", json!(key))]);
        component.render_pass();
    }

    fn ignored(&self, key: &str) {
        let Some(inner) = self.component.upgrade() else {
            return;
        };
        let component = Component { inner };
        component.with_metrics(|metrics| metrics.record_ignored_write());
        component.audit(AuditStage::StateWriteIgnored, [json_kv("field", json!(key))]);
    }
}

impl Component {
    pub(crate) fn construct(
        class: ComponentClass,
        host: Rc<dyn HostElement>,
        config: &RuntimeConfig,
    ) -> Self {
        let definition = class.definition();
        let resolution = definition.props().resolve(&*host);
        let state = StateContainer::new(definition.initial_state(), class.setters());
        let target = resolve_root(definition.root_mode(), &*host, config.logger.as_ref());

        let inner = Rc::new(ComponentInner {
            class: class.clone(),
            host,
            props: RefCell::new(Rc::new(resolution.props)),
            diagnostics: RefCell::new(Vec::new()),
            state,
            target,
            lifecycle: Cell::new(LifecycleState::Constructed),
            config: config.clone(),
        });
        inner.state.observe(Rc::new(RenderOnWrite {
            component: Rc::downgrade(&inner),
        }));

        let component = Component { inner };
        component.report(resolution.diagnostics);
        component.with_metrics(|metrics| metrics.record_instance());
        component.audit(
            AuditStage::Constructed,
            [
                json_kv("props", json!(component.props().len())),
                json_kv("root", json!(format!("{:?}", component.render_target().kind()))),
            ],
        );
        component
    }

    pub fn tag_name(&self) -> &str {
        self.inner.class.tag_name()
    }

    pub fn class(&self) -> &ComponentClass {
        &self.inner.class
    }

    pub fn host(&self) -> &Rc<dyn HostElement> {
        &self.inner.host
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.inner.lifecycle.get()
    }

    /// The current resolved props. A later attribute change replaces them
    /// rather than mutating this value.
    pub fn props(&self) -> Rc<ResolvedProps> {
        Rc::clone(&*self.inner.props.borrow())
    }

    /// Value of prop `name`, `Null` when it is not declared.
    pub fn prop(&self, name: &str) -> Value {
        self.inner
            .props
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn state(&self) -> &StateContainer {
        &self.inner.state
    }

    /// Declared getters bound to this instance.
    pub fn getters(&self) -> Getters<'_, Component> {
        self.inner.class.definition().getters().bind(self)
    }

    /// Evaluate getter `name` now.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.class.definition().getters().evaluate(name, self)
    }

    pub fn render_target(&self) -> &RenderTarget {
        &self.inner.target
    }

    /// Diagnostics produced by the most recent props resolution.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.diagnostics.borrow().clone()
    }

    /// Route a host lifecycle notification to its transition.
    pub fn dispatch(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Connected => self.connected_callback(),
            LifecycleEvent::AttributeChanged {
                name,
                old_value,
                new_value,
            } => self.attribute_changed_callback(&name, old_value.as_deref(), new_value.as_deref()),
            LifecycleEvent::Disconnected => self.disconnected_callback(),
        }
    }

    /// Attached to a live document: render once, then run `ready`.
    pub fn connected_callback(&self) {
        self.inner.lifecycle.set(LifecycleState::Connected);
        self.audit(AuditStage::Connected, std::iter::empty());
        self.render_pass();

        if let Some(ready) = self.inner.class.definition().ready_hook() {
            ready(self);
            self.audit(AuditStage::Ready, std::iter::empty());
        }
    }

    /// An observed attribute changed: re-resolve every prop and render.
    pub fn attribute_changed_callback(
        &self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        self.with_metrics(|metrics| metrics.record_attribute_change());
        self.audit(
            AuditStage::AttributeChanged,
            [
                json_kv("attribute", json!(name)),
                json_kv("old", json!(old_value)),
                json_kv("new", json!(new_value)),
            ],
        );
        self.refresh_props();
        self.render_pass();
    }

    /// Detached from the document: run `removed`, no render.
    pub fn disconnected_callback(&self) {
        self.inner.lifecycle.set(LifecycleState::Disconnected);
        self.audit(AuditStage::Disconnected, std::iter::empty());

        if let Some(removed) = self.inner.class.definition().removed_hook() {
            removed(self);
            self.audit(AuditStage::Removed, std::iter::empty());
        }
    }

    /// Run the render function and replace the render target's content with
    /// its markup. Nothing is written when there is no render function or
    /// the markup is empty.
    pub fn render_pass(&self) -> RenderOutcome {
        let markup = match self.inner.class.definition().render_fn() {
            Some(render) => render(self),
            None => String::new(),
        };

        if markup.is_empty() {
            self.with_metrics(|metrics| metrics.record_skipped_render());
            self.audit(AuditStage::RenderSkipped, std::iter::empty());
            return RenderOutcome::Skipped;
        }

        self.inner.target.replace_content(&markup);
        self.with_metrics(|metrics| metrics.record_render());
        self.audit(
            AuditStage::RenderCommitted,
            [json_kv("bytes", json!(markup.len()))],
        );
        RenderOutcome::Committed
    }

    fn refresh_props(&self) {
        let resolution = self
            .inner
            .class
            .definition()
            .props()
            .resolve(&*self.inner.host);
        *self.inner.props.borrow_mut() = Rc::new(resolution.props);
        self.report(resolution.diagnostics);
    }

    fn report(&self, diagnostics: Vec<Diagnostic>) {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        self.with_metrics(|metrics| metrics.record_diagnostics(warnings, errors));

        if let Some(logger) = self.inner.config.logger.as_ref() {
            for diagnostic in &diagnostics {
                let _ = logger.log_event(diagnostic.to_log_event(self.tag_name()));
            }
        }
        *self.inner.diagnostics.borrow_mut() = diagnostics;
    }

    fn with_metrics(&self, record: impl FnOnce(&mut crate::metrics::RenderMetrics)) {
        if let Some(metrics) = self.inner.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn audit<I>(&self, stage: AuditStage, details: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let mut builder = AuditEventBuilder::new(stage, self.tag_name());
        for (key, value) in details {
            builder.detail(key, value);
        }
        self.inner.config.audit.record(builder.finish());
    }
}
