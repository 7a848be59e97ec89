//! Quizcast Protocol - Wire types shared between engine and clients.
//!
//! All messages carry a `type` string discriminator. Field names and
//! discriminator spellings are frozen: existing clients parse them
//! verbatim, so renaming anything here is a breaking change.

mod messages;
mod views;

pub use messages::{ClientMessage, ServerMessage};
pub use views::{GameStateView, GameSummary, LeaderboardEntry, PlayerInfo};
