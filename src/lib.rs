//! Minimal reactive custom-element component runtime.
//!
//! A [`ComponentDefinition`] declares a tag name, typed props, initial state,
//! computed getters, setter overrides, a render function and lifecycle hooks.
//! [`define`] turns it into a [`ComponentClass`]; each instance is a
//! [`Component`] that coerces attributes into props, re-renders when state is
//! written, and follows the connected / attribute-changed / disconnected
//! lifecycle. [`Document`] is an in-memory host that drives instances the way
//! a browser's element dispatcher would.

pub mod error;
pub mod getters;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod props;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod state;
pub mod template;
pub mod value;

pub use error::{Result, TatlError};
pub use getters::{GetterRegistry, Getters};
pub use host::{HostElement, MemoryElement};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, StderrSink,
};
pub use metrics::{MetricSnapshot, RenderMetrics};
pub use props::{
    Diagnostic, DiagnosticKind, PropSchema, PropSpec, PropType, PropsResolution, ResolvedProps,
    attribute_name,
};
pub use registry::ElementRegistry;
pub use render::{RenderTarget, RootMode, ShadowMode, TargetKind};
pub use runtime::{
    AuditEvent, AuditLog, AuditStage, Component, ComponentAudit, ComponentClass,
    ComponentDefinition, Document, DocumentEvent, ElementId, LifecycleEvent, LifecycleLogger,
    LifecycleState, NullAudit, RenderOutcome, RuntimeConfig, define,
};
pub use state::{SetterFn, StateContainer, WriteOutcome};
pub use template::html;
pub use value::Value;
