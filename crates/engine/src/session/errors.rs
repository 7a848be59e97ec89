//! Quiz session error types

use quizcast_domain::DomainError;

/// Error types for quiz session operations.
///
/// None of these are fatal: every variant maps to a typed alert for the
/// originating connection while the quiz itself stays consistent.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("{0} has already joined this game")]
    AlreadyJoined(String),

    #[error("The game has already finished")]
    GameFinished,

    #[error("The game has already started")]
    AlreadyStarted,

    #[error("Not enough players or questions to start the game")]
    NotEnoughPlayersOrQuestions,

    #[error("Only the game admin can start the game")]
    NotAdmin,

    #[error(transparent)]
    InvalidQuestion(#[from] DomainError),
}
