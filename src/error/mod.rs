//! Error types shared across the runtime.
//!
//! Only host plumbing (attribute lookup, shadow attachment, registration,
//! document bookkeeping) returns errors. The component controller absorbs
//! them and reports diagnostics instead.

mod types;

pub use types::{Result, TatlError};
