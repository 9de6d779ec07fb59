use serde::Serialize;
use serde_json::json;

use crate::logging::{LogEvent, LogLevel, event_with_fields, json_kv};

/// Reportable conditions raised while resolving props.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Required property missing, declared default used instead.
    RequiredDefaulted,
    /// Required property missing with no default; resolved to null.
    RequiredMissing,
    /// Structured-object attribute did not parse; resolved to `{}`.
    StructuredParse,
    /// The host refused the attribute lookup; treated as absent.
    AttributeAccess,
}

impl DiagnosticKind {
    pub fn level(self) -> LogLevel {
        match self {
            DiagnosticKind::RequiredDefaulted => LogLevel::Warn,
            DiagnosticKind::RequiredMissing
            | DiagnosticKind::StructuredParse
            | DiagnosticKind::AttributeAccess => LogLevel::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::RequiredDefaulted => "required_defaulted",
            DiagnosticKind::RequiredMissing => "required_missing",
            DiagnosticKind::StructuredParse => "structured_parse",
            DiagnosticKind::AttributeAccess => "attribute_access",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub property: String,
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, property: &str, attribute: &str) -> Self {
        Self {
            kind,
            property: property.to_string(),
            attribute: attribute.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn level(&self) -> LogLevel {
        self.kind.level()
    }

    pub fn is_error(&self) -> bool {
        self.level() == LogLevel::Error
    }

    pub fn message(&self) -> String {
        let base = match self.kind {
            DiagnosticKind::RequiredDefaulted => format!(
                "required attribute '{}' has no value set, so the default has been used",
                self.attribute
            ),
            DiagnosticKind::RequiredMissing => {
                format!("required attribute '{}' has no value set", self.attribute)
            }
            DiagnosticKind::StructuredParse => {
                format!("attribute '{}' is not a valid structured literal", self.attribute)
            }
            DiagnosticKind::AttributeAccess => {
                format!("attribute '{}' could not be read", self.attribute)
            }
        };
        match &self.detail {
            Some(detail) => format!("{base}: {detail}"),
            None => base,
        }
    }

    pub fn to_log_event(&self, tag: &str) -> LogEvent {
        let mut fields = vec![
            json_kv("kind", json!(self.kind.as_str())),
            json_kv("tag", json!(tag)),
            json_kv("property", json!(self.property)),
            json_kv("attribute", json!(self.attribute)),
        ];
        if let Some(detail) = &self.detail {
            fields.push(json_kv("detail", json!(detail)));
        }
        event_with_fields(self.level(), "tatl::props", &self.message(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaulted_requirement_is_a_warning() {
        let diagnostic = Diagnostic::new(DiagnosticKind::RequiredDefaulted, "label", "label");
        assert_eq!(diagnostic.level(), LogLevel::Warn);
        assert!(!diagnostic.is_error());
    }

    #[test]
    fn log_event_carries_property_and_detail() {
        let event = Diagnostic::new(DiagnosticKind::StructuredParse, "otherAttributes", "other-attributes")
            .with_detail("expected value at line 1 column 1")
            .to_log_event("input-field");
        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.target, "tatl::props");
        assert_eq!(event.field("property"), Some(&json!("otherAttributes")));
        assert!(event.message.contains("other-attributes"));
        assert!(event.message.ends_with("column 1"));
    }
}
