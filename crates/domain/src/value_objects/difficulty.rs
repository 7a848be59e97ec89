use serde::{Deserialize, Serialize};

/// Difficulty tier claimed with an answer submission.
///
/// The tier scales the base award for a correct answer. Clients send it as
/// a free-form string; anything unrecognized falls back to Medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse: case-insensitive, unknown tiers default to Medium.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("Easy"), Difficulty::Easy);
        assert_eq!(Difficulty::parse("HARD"), Difficulty::Hard);
    }

    #[test]
    fn unknown_tier_defaults_to_medium() {
        assert_eq!(Difficulty::parse("nightmare"), Difficulty::Medium);
        assert_eq!(Difficulty::parse(""), Difficulty::Medium);
    }
}
