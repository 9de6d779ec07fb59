//! Property schema and attribute coercion.
//!
//! A [`PropSchema`] declares the typed, externally settable attributes of a
//! component. [`PropSchema::resolve`] reads every declared attribute from a
//! host element and coerces it, collecting [`Diagnostic`]s instead of failing.

mod core;
mod diagnostics;

pub use self::core::{
    Coerced, PropSchema, PropSpec, PropType, PropsResolution, ResolvedProps, attribute_name,
    parse_integer,
};
pub use self::diagnostics::{Diagnostic, DiagnosticKind};
