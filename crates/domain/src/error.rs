//! Domain error types

/// Validation failures for quiz data supplied at creation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("question '{0}' must have at least two options")]
    TooFewOptions(String),

    #[error("question '{0}' has correct answer index {1} but only {2} options")]
    CorrectAnswerOutOfRange(String, usize, usize),
}
