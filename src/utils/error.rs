/// Utility enum that covers all possible errors raised while handling a `KeptnWorkload`
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON, or a field whose value has the wrong shape.
    #[error("Invalid JSON document: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    /// A required field is absent. Carries the dotted path, e.g. `spec.resourceReference.uid`.
    #[error("Invalid resource: missing required field `{0}`")]
    MissingField(String),

    /// The document names an apiVersion/kind that was never registered.
    #[error("Unregistered kind {kind} in {api_version}")]
    UnregisteredKind { api_version: String, kind: String },

    /// The span handed in for attribute emission has an invalid context or has already ended.
    #[error("Invalid span: attributes can only be set on a valid, recording span")]
    InvalidSpan,

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}
