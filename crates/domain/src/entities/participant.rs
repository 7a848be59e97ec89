use serde::{Deserialize, Serialize};

/// An identified person who can join quizzes.
///
/// Identity is resolved by an external collaborator (token decoding lives
/// outside the engine); the core never generates these fields. Immutable
/// once attached to a quiz roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Globally stable across reconnects
    pub user_id: String,
    pub name: String,
    pub avatar: String,
}

impl Participant {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}
