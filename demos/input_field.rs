//! Renders an `input-field` component through a scripted document session and
//! prints the markup after each step. Diagnostics go to stderr.

use serde_json::json;
use tatl::{
    ComponentDefinition, Document, DocumentEvent, LifecycleLogger, LogLevel, Logger, PropSpec,
    Result, RuntimeConfig, Value, html,
};

fn input_field() -> ComponentDefinition {
    ComponentDefinition::new("input-field")
        .prop("type", PropSpec::text().required())
        .prop("id", PropSpec::text().required())
        .prop("className", PropSpec::text().default(""))
        .prop("required", PropSpec::boolean().default(false))
        .prop("otherAttributes", PropSpec::object().default(json!({})))
        .getter("requiredAttribute", |c| {
            Value::from(if c.prop("required").is_truthy() { " required" } else { "" })
        })
        .getter("otherAttributes", |c| {
            let attributes = c.prop("otherAttributes");
            let rendered = attributes
                .as_object()
                .and_then(|value| value.as_object())
                .map(|map| {
                    map.iter()
                        .map(|(key, value)| match value.as_str() {
                            Some(text) => format!(" {key}=\"{text}\""),
                            None => format!(" {key}=\"{value}\""),
                        })
                        .collect::<String>()
                })
                .unwrap_or_default();
            Value::from(rendered)
        })
        .render(|c| {
            html!(
                "<input type=\"" {c.prop("type")} "\" name=\"" {c.prop("id")}
                "\" id=\"" {c.prop("id")} "\" class=\"" {c.prop("className")} "\""
                {c.get("requiredAttribute")} {c.get("otherAttributes")} " />"
            )
        })
}

fn main() -> Result<()> {
    let logger = Logger::stderr();
    let config = RuntimeConfig::default()
        .with_logger(logger.clone())
        .with_audit(std::sync::Arc::new(
            LifecycleLogger::new(logger).with_level(LogLevel::Info),
        ));
    let mut document = Document::new(config);
    document.define(input_field())?;

    // Missing `type`: an error diagnostic is logged and it renders empty.
    let field = document.create_element_with("input-field", [("id", "email")]);
    document.append(field)?;
    println!("{}", document.content(field)?);

    document.run_scripted([
        DocumentEvent::SetAttribute {
            element: field,
            name: "type".into(),
            value: "email".into(),
        },
        DocumentEvent::SetAttribute {
            element: field,
            name: "required".into(),
            value: "true".into(),
        },
        DocumentEvent::SetProperty {
            element: field,
            property: "otherAttributes".into(),
            value: Value::from(json!({"placeholder": "you@example.com", "maxlength": 64})),
        },
    ])?;
    println!("{}", document.content(field)?);

    document.remove(field)?;
    Ok(())
}
