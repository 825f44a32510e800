use thiserror::Error;

/// Failures at the edges of the crate: loading documents, reading action
/// batches, writing reports. Extraction and dispatch themselves never fail.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed (action batches, transport payloads)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed (extraction output)
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A CSS selector used to choose extraction roots could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The document has no body to extract in whole-document mode
    #[error("Document has no <body> element")]
    MissingBody,
}
