use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::json;

use crate::host::HostElement;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

/// External visibility of an attached shadow tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowMode {
    Open,
    Closed,
}

impl fmt::Display for ShadowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadowMode::Open => f.write_str("open"),
            ShadowMode::Closed => f.write_str("closed"),
        }
    }
}

/// Where a [`RenderTarget`] lives relative to its host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The host element's own light tree.
    Light,
    /// An isolated shadow tree attached to the host.
    Shadow(ShadowMode),
}

/// Shared handle to the node a component writes markup into.
///
/// Clones point at the same node, so the host element and the component it
/// carries observe the same content.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    kind: TargetKind,
    content: Rc<RefCell<String>>,
}

impl RenderTarget {
    pub fn light() -> Self {
        Self::with_kind(TargetKind::Light)
    }

    pub fn shadow(mode: ShadowMode) -> Self {
        Self::with_kind(TargetKind::Shadow(mode))
    }

    fn with_kind(kind: TargetKind) -> Self {
        Self {
            kind,
            content: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// Replace the node's entire content with `markup`.
    pub fn replace_content(&self, markup: &str) {
        let mut content = self.content.borrow_mut();
        content.clear();
        content.push_str(markup);
    }

    /// Whether both handles refer to the same node.
    pub fn same_node(&self, other: &RenderTarget) -> bool {
        Rc::ptr_eq(&self.content, &other.content)
    }
}

/// Root-mode selector declared on a component definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMode {
    #[default]
    Standard,
    ShadowOpen,
    ShadowClosed,
}

impl RootMode {
    /// Parse a selector. Unrecognised selectors fall back to `Standard`.
    pub fn parse(selector: &str) -> Self {
        match selector.trim() {
            "shadow" | "shadow-open" | "shadow:open" => RootMode::ShadowOpen,
            "shadow-closed" | "shadow:closed" => RootMode::ShadowClosed,
            _ => RootMode::Standard,
        }
    }
}

impl From<&str> for RootMode {
    fn from(selector: &str) -> Self {
        RootMode::parse(selector)
    }
}

/// Pick the node renders for `host` will write into.
///
/// A failed shadow attachment is logged and the host's light root is used
/// instead.
pub fn resolve_root(mode: RootMode, host: &dyn HostElement, logger: Option<&Logger>) -> RenderTarget {
    let shadow_mode = match mode {
        RootMode::Standard => return host.light_root(),
        RootMode::ShadowOpen => ShadowMode::Open,
        RootMode::ShadowClosed => ShadowMode::Closed,
    };

    match host.attach_shadow(shadow_mode) {
        Ok(target) => target,
        Err(err) => {
            if let Some(logger) = logger {
                let event = event_with_fields(
                    LogLevel::Error,
                    "tatl::render",
                    "shadow_attach_failed",
                    [
                        json_kv("tag", json!(host.tag_name())),
                        json_kv("mode", json!(shadow_mode.to_string())),
                        json_kv("error", json!(err.to_string())),
                    ],
                );
                let _ = logger.log_event(event);
            }
            host.light_root()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryElement;
    use crate::logging::MemorySink;
    use std::sync::Arc;

    #[test]
    fn standard_mode_writes_into_the_host() {
        let host = MemoryElement::new("x-card");
        let target = resolve_root(RootMode::Standard, &host, None);
        assert_eq!(target.kind(), TargetKind::Light);

        target.replace_content("<p>hi</p>");
        assert_eq!(host.inner_html(), "<p>hi</p>");
    }

    #[test]
    fn shadow_modes_attach_isolated_trees() {
        let open = MemoryElement::new("x-open");
        let target = resolve_root(RootMode::ShadowOpen, &open, None);
        assert_eq!(target.kind(), TargetKind::Shadow(ShadowMode::Open));
        target.replace_content("<slot></slot>");
        assert_eq!(open.inner_html(), "");
        assert_eq!(open.shadow_root().map(|root| root.content()).as_deref(), Some("<slot></slot>"));

        let closed = MemoryElement::new("x-closed");
        let target = resolve_root(RootMode::ShadowClosed, &closed, None);
        assert_eq!(target.kind(), TargetKind::Shadow(ShadowMode::Closed));
        assert!(closed.shadow_root().is_none());
    }

    #[test]
    fn failed_attachment_falls_back_to_light_root() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::from_arc(sink.clone());
        let host = MemoryElement::new("x-twice");
        host.attach_shadow(ShadowMode::Open).unwrap();

        let target = resolve_root(RootMode::ShadowOpen, &host, Some(&logger));
        assert_eq!(target.kind(), TargetKind::Light);
        assert_eq!(sink.events_at(LogLevel::Error).len(), 1);
    }

    #[test]
    fn selectors_parse_with_standard_fallback() {
        assert_eq!(RootMode::parse("shadow"), RootMode::ShadowOpen);
        assert_eq!(RootMode::parse("shadow:closed"), RootMode::ShadowClosed);
        assert_eq!(RootMode::parse("shadow-closed"), RootMode::ShadowClosed);
        assert_eq!(RootMode::parse("whatever"), RootMode::Standard);
    }
}
