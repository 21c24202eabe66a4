use thiserror::Error;

/// Failures of the core computation itself. Invalid sessions are not errors;
/// they are [`crate::types::ValidityResult`] outcomes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("expected {expected} trials, got {actual}")]
    TrialCountMismatch { expected: usize, actual: usize },

    #[error("protocol cannot satisfy no-go placement constraints: {0}")]
    UnsatisfiableProtocol(String),

    #[error("malformed session record: {0}")]
    MalformedHistory(String),
}

/// Failures at the storage-collaborator boundary. Consumers degrade to the
/// circadian fallback instead of propagating these as hard errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session fetch failed: {0}")]
    Unavailable(String),
}
