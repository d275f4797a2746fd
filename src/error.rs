//! Error types for conno.

use thiserror::Error;

/// Result type for conno operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for conno operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Lexicon source could not be read or contained an unknown label.
    #[error("Lexicon load failed: {0}")]
    LexiconLoad(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The annotation backend failed on one document.
    #[error("Document processing failed for '{doc_id}': {message}")]
    DocumentProcessing {
        /// Identifier of the document that failed.
        doc_id: String,
        /// Backend-reported failure description.
        message: String,
    },

    /// Accessor called with a document id never seen by `train`.
    #[error("Unknown document id: {0}")]
    UnknownDocumentId(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error from the lexicon source.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a lexicon load error.
    pub fn lexicon_load(msg: impl Into<String>) -> Self {
        Error::LexiconLoad(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a document processing error.
    pub fn document_processing(doc_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::DocumentProcessing {
            doc_id: doc_id.into(),
            message: message.into(),
        }
    }

    /// Create an unknown document id error.
    pub fn unknown_document_id(doc_id: impl Into<String>) -> Self {
        Error::UnknownDocumentId(doc_id.into())
    }
}
