use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One multiple-choice question.
///
/// The full question list is fixed when a quiz is created; there is no
/// mid-game mutation. Wire field names match deployed clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    /// 0-based index into `options`
    pub correct_answer: usize,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options,
            correct_answer,
        }
    }

    /// Check the invariants: at least two options, and a correct-answer
    /// index that is a valid index into them.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.options.len() < 2 {
            return Err(DomainError::TooFewOptions(self.id.clone()));
        }
        if self.correct_answer >= self.options.len() {
            return Err(DomainError::CorrectAnswerOutOfRange(
                self.id.clone(),
                self.correct_answer,
                self.options.len(),
            ));
        }
        Ok(())
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn valid_question_passes() {
        let q = Question::new("1", "What is 2+2?", options(4), 1);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn single_option_is_rejected() {
        let q = Question::new("1", "?", options(1), 0);
        assert_eq!(q.validate(), Err(DomainError::TooFewOptions("1".into())));
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let q = Question::new("1", "?", options(3), 3);
        assert_eq!(
            q.validate(),
            Err(DomainError::CorrectAnswerOutOfRange("1".into(), 3, 3))
        );
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let q = Question::new("1", "?", options(2), 0);
        let json = serde_json::to_value(&q).expect("serializes");
        assert!(json.get("correctAnswer").is_some());
    }
}
