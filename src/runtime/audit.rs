//! Component lifecycle audit.
//!
//! Every transition a component goes through is reported to a
//! [`ComponentAudit`] sink as an [`AuditEvent`]: a stage plus structured
//! details. Sinks can buffer, log, or ignore them; the controller does not
//! depend on what they do.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints in a component instance's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStage {
    /// Props resolved, state wrapped, render target chosen.
    Constructed,
    /// The instance was attached to a document.
    Connected,
    /// The `ready` hook ran.
    Ready,
    /// An observed attribute changed and props were re-resolved.
    AttributeChanged,
    /// A state write was stored.
    StateWritten,
    /// A state write was skipped because the value was unchanged.
    StateWriteIgnored,
    /// Rendered markup replaced the render target's content.
    RenderCommitted,
    /// No render function, or it produced nothing.
    RenderSkipped,
    /// The instance was detached from its document.
    Disconnected,
    /// The `removed` hook ran.
    Removed,
}

impl AuditStage {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStage::Constructed => "constructed",
            AuditStage::Connected => "connected",
            AuditStage::Ready => "ready",
            AuditStage::AttributeChanged => "attribute_changed",
            AuditStage::StateWritten => "state_written",
            AuditStage::StateWriteIgnored => "state_write_ignored",
            AuditStage::RenderCommitted => "render_committed",
            AuditStage::RenderSkipped => "render_skipped",
            AuditStage::Disconnected => "disconnected",
            AuditStage::Removed => "removed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub timestamp: SystemTime,
    pub stage: AuditStage,
    pub tag: String,
    pub details: Vec<(String, Value)>,
}

impl AuditEvent {
    fn new(stage: AuditStage, tag: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            tag: tag.to_string(),
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(stage: AuditStage, tag: &str) -> Self {
        Self {
            event: AuditEvent::new(stage, tag),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> AuditEvent {
        self.event
    }
}

pub trait ComponentAudit: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Discards everything. Used when auditing is not configured.
#[derive(Debug, Default)]
pub struct NullAudit;

impl ComponentAudit for NullAudit {
    fn record(&self, _event: AuditEvent) {}
}

/// Buffers events in arrival order.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<AuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn count(&self, stage: AuditStage) -> usize {
        self.stages().into_iter().filter(|s| *s == stage).count()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl ComponentAudit for AuditLog {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
