//! Quizcast Domain - Core quiz types, value objects, and invariants.
//!
//! Pure data and rules only: no transports, no async, no I/O. The engine
//! crate owns everything that touches connections or time-of-day concerns.

pub mod entities;
pub mod error;
pub mod ids;
pub mod scoring;
pub mod value_objects;

pub use entities::{Participant, Question};
pub use error::DomainError;
pub use ids::QuizId;
pub use value_objects::{Difficulty, QuizStatus};
