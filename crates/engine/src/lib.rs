//! Quizcast Engine library.
//!
//! This crate contains all server-side code for the quiz engine.
//!
//! ## Structure
//!
//! - `session/` - Quiz state machine, scoreboard, and the game registry
//! - `api/` - HTTP and WebSocket entry points
//! - `results` - Finished-game hand-off to the external store
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod results;
pub mod session;

pub use app::App;
