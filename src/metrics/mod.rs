use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;

/// Counters shared by every component created under one [`crate::RuntimeConfig`].
#[derive(Debug, Default, Clone)]
pub struct RenderMetrics {
    instances: u64,
    renders: u64,
    skipped_renders: u64,
    state_writes: u64,
    ignored_writes: u64,
    attribute_changes: u64,
    warnings: u64,
    errors: u64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_instance(&mut self) {
        self.instances = self.instances.saturating_add(1);
    }

    pub fn record_render(&mut self) {
        self.renders = self.renders.saturating_add(1);
    }

    pub fn record_skipped_render(&mut self) {
        self.skipped_renders = self.skipped_renders.saturating_add(1);
    }

    pub fn record_state_write(&mut self) {
        self.state_writes = self.state_writes.saturating_add(1);
    }

    pub fn record_ignored_write(&mut self) {
        self.ignored_writes = self.ignored_writes.saturating_add(1);
    }

    pub fn record_attribute_change(&mut self) {
        self.attribute_changes = self.attribute_changes.saturating_add(1);
    }

    pub fn record_diagnostics(&mut self, warnings: usize, errors: usize) {
        self.warnings = self.warnings.saturating_add(warnings as u64);
        self.errors = self.errors.saturating_add(errors as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            instances: self.instances,
            renders: self.renders,
            skipped_renders: self.skipped_renders,
            state_writes: self.state_writes,
            ignored_writes: self.ignored_writes,
            attribute_changes: self.attribute_changes,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub instances: u64,
    pub renders: u64,
    pub skipped_renders: u64,
    pub state_writes: u64,
    pub ignored_writes: u64,
    pub attribute_changes: u64,
    pub warnings: u64,
    pub errors: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        match json!(self) {
            serde_json::Value::Object(map) => map,
            _ => LogFields::new(),
        }
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "render_metrics", self.as_fields())
    }
}
