use serde::{Deserialize, Serialize};

/// Lifecycle of a quiz.
///
/// Transitions only ever move forward: Waiting -> InProgress -> Finished.
/// The string forms are part of the wire contract; deployed clients
/// switch on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizStatus {
    Waiting,
    InProgress,
    Finished,
}

impl QuizStatus {
    pub fn is_terminal(self) -> bool {
        self == QuizStatus::Finished
    }
}
