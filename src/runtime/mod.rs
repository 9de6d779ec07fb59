use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::logging::Logger;
use crate::metrics::{MetricSnapshot, RenderMetrics};
use crate::registry::ElementRegistry;

pub mod audit;
pub mod component;
pub mod definition;
pub mod diagnostics;
pub mod document;

pub use audit::{AuditEvent, AuditEventBuilder, AuditLog, AuditStage, ComponentAudit, NullAudit};
pub use component::{Component, LifecycleEvent, LifecycleState, RenderOutcome};
pub use definition::{ComponentClass, ComponentDefinition, HookFn, RenderFn};
pub use diagnostics::LifecycleLogger;
pub use document::{Document, DocumentEvent, ElementId};

/// Configuration shared by every component instance created under it.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Diagnostic channel. `None` silences coercion warnings and errors.
    pub logger: Option<Logger>,
    /// Counters accumulated across instances.
    pub metrics: Option<Arc<Mutex<RenderMetrics>>>,
    /// Receives every lifecycle stage.
    pub audit: Arc<dyn ComponentAudit>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logger: Some(Logger::stderr()),
            metrics: None,
            audit: Arc::new(NullAudit),
            metrics_target: "tatl::metrics".to_string(),
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("logger", &self.logger.is_some())
            .field("metrics", &self.metrics.is_some())
            .field("metrics_target", &self.metrics_target)
            .finish_non_exhaustive()
    }
}

impl RuntimeConfig {
    /// Configuration without a diagnostic channel.
    pub fn quiet() -> Self {
        Self {
            logger: None,
            ..Self::default()
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn ComponentAudit>) -> Self {
        self.audit = audit;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RenderMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RenderMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Log a metrics snapshot through the logger, returning it.
    pub fn emit_metrics(&self) -> Option<MetricSnapshot> {
        let snapshot = self.metrics.as_ref()?.lock().ok()?.snapshot();
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(snapshot.to_log_event(&self.metrics_target));
        }
        Some(snapshot)
    }
}

/// Turn a definition into a component class and, when a registry is
/// available, register it under its tag name.
pub fn define(
    definition: ComponentDefinition,
    registry: Option<&mut ElementRegistry>,
) -> Result<ComponentClass> {
    let class = ComponentClass::new(definition);
    if let Some(registry) = registry {
        registry.define(class.clone())?;
    }
    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemorySink};

    #[test]
    fn define_without_registry_still_yields_a_class() {
        let class = define(ComponentDefinition::new("x-free"), None).unwrap();
        assert_eq!(class.tag_name(), "x-free");
    }

    #[test]
    fn define_reports_redefinition() {
        let mut registry = ElementRegistry::new();
        define(ComponentDefinition::new("x-once"), Some(&mut registry)).unwrap();
        assert!(define(ComponentDefinition::new("x-once"), Some(&mut registry)).is_err());
        assert!(registry.already_registered("x-once"));
    }

    #[test]
    fn metrics_snapshot_is_logged_to_target() {
        let sink = Arc::new(MemorySink::new());
        let mut config = RuntimeConfig::quiet().with_logger(Logger::from_arc(sink.clone()));
        assert!(config.emit_metrics().is_none());

        config.enable_metrics();
        let snapshot = config.emit_metrics().unwrap();
        assert_eq!(snapshot.renders, 0);
        let events = sink.events_at(LogLevel::Info);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, "tatl::metrics");

        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
