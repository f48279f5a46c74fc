use thiserror::Error;

/// Business errors for diagram workflows.
///
/// `Integrity` and `NotFound` are deliberately distinct: the former means
/// metadata references a blob that does not exist and needs manual
/// remediation, the latter is an ordinary miss the caller can act on.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("diagram not found")]
    NotFound,
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("blob storage unavailable: {0}")]
    Storage(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl DiagramError {
    /// Stable numeric code for external mapping/logging.
    pub fn code(&self) -> u16 {
        match self {
            DiagramError::Validation(_) => 2001,
            DiagramError::NotFound => 2002,
            DiagramError::Integrity(_) => 2101,
            DiagramError::Storage(_) => 2201,
            DiagramError::Repository(_) => 2202,
        }
    }

    /// Whether retrying the whole operation can plausibly succeed.
    pub fn retryable(&self) -> bool {
        matches!(self, DiagramError::Storage(_) | DiagramError::Repository(_))
    }
}

impl From<crate::storage::BlobError> for DiagramError {
    fn from(e: crate::storage::BlobError) -> Self {
        match e {
            crate::storage::BlobError::NotFound(key) => {
                DiagramError::Integrity(format!("metadata references missing blob {key}"))
            }
            crate::storage::BlobError::Unavailable(msg) => DiagramError::Storage(msg),
        }
    }
}

impl From<models::errors::ModelError> for DiagramError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => DiagramError::Validation(msg),
            models::errors::ModelError::NotFound(_) => DiagramError::NotFound,
            models::errors::ModelError::Db(msg) => DiagramError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BlobError;

    #[test]
    fn blob_not_found_maps_to_integrity() {
        let e: DiagramError = BlobError::NotFound("x.json".into()).into();
        assert!(matches!(e, DiagramError::Integrity(_)));
        assert!(!e.retryable());
    }

    #[test]
    fn blob_unavailable_maps_to_storage_and_is_retryable() {
        let e: DiagramError = BlobError::Unavailable("boom".into()).into();
        assert!(matches!(e, DiagramError::Storage(_)));
        assert!(e.retryable());
    }
}
