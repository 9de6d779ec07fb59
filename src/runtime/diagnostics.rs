use std::sync::Arc;

use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

use super::audit::{AuditEvent, AuditStage, ComponentAudit};

/// Audit sink that writes lifecycle stages to a [`Logger`].
pub struct LifecycleLogger {
    logger: Logger,
    level: LogLevel,
    log_state: bool,
    log_renders: bool,
    inner: Option<Arc<dyn ComponentAudit>>,
}

impl LifecycleLogger {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_state: false,
            log_renders: true,
            inner: None,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn log_state(mut self, enabled: bool) -> Self {
        self.log_state = enabled;
        self
    }

    pub fn log_renders(mut self, enabled: bool) -> Self {
        self.log_renders = enabled;
        self
    }

    /// Forward every event to another sink after logging it.
    pub fn forward_to(mut self, inner: Arc<dyn ComponentAudit>) -> Self {
        self.inner = Some(inner);
        self
    }

    fn wants(&self, stage: AuditStage) -> bool {
        match stage {
            AuditStage::StateWritten | AuditStage::StateWriteIgnored => self.log_state,
            AuditStage::RenderCommitted | AuditStage::RenderSkipped => self.log_renders,
            _ => true,
        }
    }
}

impl ComponentAudit for LifecycleLogger {
    fn record(&self, event: AuditEvent) {
        if self.wants(event.stage) {
            let mut fields = vec![json_kv("tag", json!(event.tag))];
            fields.extend(event.details.iter().cloned());
            let log_event = event_with_fields(
                self.level,
                "tatl::lifecycle",
                event.stage.as_str(),
                fields,
            );
            let _ = self.logger.log_event(log_event);
        }

        if let Some(inner) = &self.inner {
            inner.record(event);
        }
    }
}
