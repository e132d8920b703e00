use thiserror::Error;

/// Main error type for Mdmclone
#[derive(Error, Debug)]
pub enum MdmCloneError {
    /// HTTP transport errors (MDM queries, numbering service, upload)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Numbering service credential could not be obtained
    #[error("Numbering service unavailable: {0}")]
    IssuerUnavailable(String),

    /// No article classification code found for the seed identifier
    #[error("Article classification not found for {0}")]
    ClassificationNotFound(String),

    /// No numbering sequence key found for a classification code
    #[error("Numbering sequence key not found for classification {0}")]
    SequenceKeyNotFound(String),

    /// Numbering service returned an empty value
    #[error("Numbering service returned an empty article number")]
    EmptyIssuedValue,

    /// Supplier lookup returned no match
    #[error("Supplier not found for number {0}")]
    SupplierNotFound(String),

    /// The working set contains no article entity
    #[error("No entity of type {0} in the working set")]
    RootEntityMissing(String),

    /// A remap batch may contain at most one article entity
    #[error("Batch contains {0} article entities, expected at most one")]
    MultipleArticles(usize),
}

/// Convenient Result type using MdmCloneError
pub type Result<T> = std::result::Result<T, MdmCloneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MdmCloneError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MdmCloneError = io_err.into();
        assert!(matches!(err, MdmCloneError::Io(_)));
    }

    #[test]
    fn test_supplier_not_found_carries_number() {
        let err = MdmCloneError::SupplierNotFound("102000".to_string());
        assert!(err.to_string().contains("102000"));
    }

    #[test]
    fn test_multiple_articles_carries_count() {
        let err = MdmCloneError::MultipleArticles(3);
        assert!(err.to_string().contains('3'));
    }
}
