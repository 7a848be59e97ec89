//! WebSocket message types exchanged between engine and clients.

use serde::{Deserialize, Serialize};

use quizcast_domain::Question;

use crate::views::{GameStateView, GameSummary};

// =============================================================================
// Client Messages (client -> engine)
// =============================================================================

/// Messages from a client to the engine.
///
/// Unknown `type` values fail deserialization; the router answers those
/// with an alert and leaves all state untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Create a new quiz with its full question list attached
    #[serde(rename = "INIT_GAME", rename_all = "camelCase")]
    InitGame {
        quiz_name: String,
        #[serde(default)]
        questions: Vec<Question>,
    },

    /// Join an existing quiz by id
    #[serde(rename = "JOIN_GAME", rename_all = "camelCase")]
    JoinGame { quiz_id: String },

    /// List all quizzes; read-only, answered to the sender only
    #[serde(rename = "LIST_GAMES")]
    ListGames,

    /// Leave the quiz this connection is bound to
    #[serde(rename = "LEAVE_GAME")]
    LeaveGame,

    /// Start the quiz; admin only
    #[serde(rename = "START_GAME")]
    StartGame,

    /// Answer the current question
    #[serde(rename = "ANSWER_QUESTION", rename_all = "camelCase")]
    AnswerQuestion {
        answer_index: usize,
        /// Client-reported time to answer; not independently verified
        #[serde(default)]
        elapsed_millis: u64,
        /// Difficulty tier; unrecognized values fall back to medium
        #[serde(default)]
        difficulty: Option<String>,
    },

    /// Advance to the next question, or finish on the last one
    #[serde(rename = "NEXT_QUESTION")]
    NextQuestion,
}

// =============================================================================
// Server Messages (engine -> client)
// =============================================================================

/// Messages from the engine to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent to the creator once their quiz is registered
    #[serde(rename = "GAME_ADDED", rename_all = "camelCase")]
    GameAdded { quiz_id: String },

    /// Typed notice for the originating connection (errors, rejections)
    #[serde(rename = "GAME_ALERT")]
    GameAlert { message: String },

    /// Response to LIST_GAMES; sender only
    #[serde(rename = "GAMES_LIST")]
    GamesList { games: Vec<GameSummary> },

    /// Full state snapshot broadcast after every successful mutation
    #[serde(rename = "gameState")]
    GameState { data: GameStateView },
}
