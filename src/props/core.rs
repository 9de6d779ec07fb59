use std::collections::BTreeMap;

use serde::Serialize;

use crate::host::HostElement;
use crate::value::Value;

use super::diagnostics::{Diagnostic, DiagnosticKind};

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropType {
    #[default]
    Text,
    Integer,
    Boolean,
    StructuredObject,
}

/// Outcome of coercing one raw attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    /// Set when the raw value could not be parsed and a fallback was used.
    pub error: Option<String>,
}

impl Coerced {
    fn ok(value: Value) -> Self {
        Self { value, error: None }
    }
}

impl PropType {
    pub fn coerce(self, raw: Option<&str>) -> Coerced {
        match self {
            PropType::Text => Coerced::ok(coerce_text(raw)),
            PropType::Integer => Coerced::ok(coerce_integer(raw)),
            PropType::Boolean => Coerced::ok(coerce_boolean(raw)),
            PropType::StructuredObject => coerce_structured(raw),
        }
    }
}

fn coerce_text(raw: Option<&str>) -> Value {
    Value::from(raw)
}

fn coerce_integer(raw: Option<&str>) -> Value {
    Value::Number(raw.map_or(f64::NAN, parse_integer))
}

fn coerce_boolean(raw: Option<&str>) -> Value {
    Value::Bool(raw == Some("true"))
}

fn coerce_structured(raw: Option<&str>) -> Coerced {
    // An absent literal reads as `null`, which parses cleanly.
    let Some(raw) = raw else {
        return Coerced::ok(Value::Null);
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(parsed) => Coerced::ok(Value::Object(parsed)),
        Err(err) => Coerced {
            value: Value::empty_object(),
            error: Some(err.to_string()),
        },
    }
}

/// Base-10 prefix parse: leading whitespace, optional sign, then the longest
/// run of digits. No digits yields NaN.
pub fn parse_integer(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return f64::NAN;
    }
    let magnitude = digits[..end].parse::<f64>().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

/// Attribute name for a camel-case property name: `otherAttributes` becomes
/// `other-attributes`.
pub fn attribute_name(property: &str) -> String {
    let mut name = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// One declared property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropSpec {
    pub prop_type: PropType,
    pub required: bool,
    pub default: Option<Value>,
}

impl PropSpec {
    pub fn new(prop_type: PropType) -> Self {
        Self {
            prop_type,
            required: false,
            default: None,
        }
    }

    pub fn text() -> Self {
        Self::new(PropType::Text)
    }

    pub fn integer() -> Self {
        Self::new(PropType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(PropType::Boolean)
    }

    pub fn object() -> Self {
        Self::new(PropType::StructuredObject)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Coerced prop values keyed by property name. Replaced wholesale on every
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedProps(BTreeMap<String, Value>);

impl ResolvedProps {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropsResolution {
    pub props: ResolvedProps,
    pub diagnostics: Vec<Diagnostic>,
}

impl PropsResolution {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Ordered property declarations of a component.
#[derive(Debug, Clone, Default)]
pub struct PropSchema {
    entries: Vec<(String, PropSpec)>,
}

impl PropSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property. Redeclaring a name replaces the earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, spec: PropSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropSpec> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hyphenated attribute names of every declared property.
    pub fn observed_attributes(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(name, _)| attribute_name(name))
            .collect()
    }

    /// Find the property an attribute name belongs to.
    pub fn property_for_attribute(&self, attribute: &str) -> Option<&str> {
        let attribute = attribute.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(name, _)| attribute_name(name) == attribute)
            .map(|(name, _)| name.as_str())
    }

    /// Read and coerce every declared property from `host`.
    ///
    /// Never fails: lookup errors, missing required values and parse errors
    /// are absorbed into the returned diagnostics.
    pub fn resolve(&self, host: &dyn HostElement) -> PropsResolution {
        let mut resolution = PropsResolution::default();

        for (name, spec) in &self.entries {
            let attribute = attribute_name(name);
            let raw = match host.attribute(&attribute) {
                Ok(raw) => raw,
                Err(err) => {
                    resolution.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::AttributeAccess, name, &attribute)
                            .with_detail(err.to_string()),
                    );
                    None
                }
            };
            let missing = raw.as_deref().is_none_or(str::is_empty);

            let value = if spec.required && missing {
                match &spec.default {
                    Some(default) => {
                        resolution.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::RequiredDefaulted,
                            name,
                            &attribute,
                        ));
                        default.clone()
                    }
                    None => {
                        resolution.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::RequiredMissing,
                            name,
                            &attribute,
                        ));
                        Value::Null
                    }
                }
            } else if let (None, Some(default)) = (&raw, &spec.default) {
                default.clone()
            } else {
                let coerced = spec.prop_type.coerce(raw.as_deref());
                if let Some(error) = coerced.error {
                    resolution.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::StructuredParse, name, &attribute)
                            .with_detail(error),
                    );
                }
                coerced.value
            };

            resolution.props.0.insert(name.clone(), value);
        }

        resolution
    }
}
