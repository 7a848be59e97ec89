//! Read-only projections of quiz state shaped for clients.

use serde::{Deserialize, Serialize};

use quizcast_domain::{Question, QuizStatus};

/// One roster entry as clients render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub name: String,
    pub user_id: String,
    pub avatar: String,
}

/// One leaderboard row, score-descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
    pub user_id: String,
    pub avatar: String,
}

/// The full snapshot broadcast to every connection bound to a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub quiz_id: String,
    pub quiz_name: String,
    pub status: QuizStatus,
    pub players: Vec<PlayerInfo>,
    pub questions: Vec<Question>,
    pub current_question_index: usize,
    /// Convenience projection of `questions[currentQuestionIndex]`;
    /// null unless the quiz is in progress
    pub current_question: Option<Question>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Compact listing entry for LIST_GAMES and the HTTP listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub quiz_id: String,
    pub quiz_name: String,
    pub status: QuizStatus,
    pub players: Vec<PlayerInfo>,
}
