mod participant;
mod question;

pub use participant::Participant;
pub use question::Question;
