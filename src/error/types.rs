use thiserror::Error;

/// Unified result type for the tatl crate.
pub type Result<T> = std::result::Result<T, TatlError>;

/// Errors surfaced by host collaborators and the registration facade.
#[derive(Debug, Error)]
pub enum TatlError {
    #[error("custom element `{0}` is already defined")]
    AlreadyDefined(String),
    #[error("element `{0}` not found in document")]
    ElementNotFound(usize),
    #[error("attribute `{name}` lookup failed: {reason}")]
    AttributeAccess { name: String, reason: String },
    #[error("shadow root attachment failed: {0}")]
    ShadowAttach(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
