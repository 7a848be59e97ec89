mod difficulty;
mod quiz_status;

pub use difficulty::Difficulty;
pub use quiz_status::QuizStatus;
