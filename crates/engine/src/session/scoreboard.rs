//! Per-quiz score tracking.

use quizcast_domain::Participant;
use quizcast_protocol::LeaderboardEntry;

/// One participant's score plus the display fields the leaderboard needs,
/// denormalized so rendering never requires a second roster lookup.
#[derive(Debug, Clone)]
struct ScoreEntry {
    user_id: String,
    name: String,
    avatar: String,
    score: i64,
}

/// Cumulative scores for one quiz, owned exclusively by that quiz.
///
/// Entries keep insertion order; the leaderboard sorts with a stable sort,
/// so equal scores always rank in join order. That determinism is relied
/// on by tests and by clients diffing successive snapshots.
#[derive(Debug, Default)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant with a zero score. Re-adding an existing id is a
    /// no-op and resets nothing, matching the roster's idempotency rule.
    pub fn add_participant(&mut self, participant: &Participant) {
        if self.contains(&participant.user_id) {
            return;
        }
        self.entries.push(ScoreEntry {
            user_id: participant.user_id.clone(),
            name: participant.name.clone(),
            avatar: participant.avatar.clone(),
            score: 0,
        });
    }

    /// Remove a participant's entry; absent ids are ignored.
    pub fn remove_participant(&mut self, user_id: &str) {
        self.entries.retain(|e| e.user_id != user_id);
    }

    /// Add `delta` (possibly negative) to a participant's score. Missing
    /// entries start from 0 under an "Unknown" display name, so a late or
    /// untracked scorer never loses points.
    pub fn update_score(&mut self, user_id: &str, delta: i64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.user_id == user_id) {
            entry.score += delta;
            return;
        }
        self.entries.push(ScoreEntry {
            user_id: user_id.to_string(),
            name: "Unknown".to_string(),
            avatar: String::new(),
            score: delta,
        });
    }

    pub fn score(&self, user_id: &str) -> i64 {
        self.entries
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.score)
            .unwrap_or(0)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.entries.iter().any(|e| e.user_id == user_id)
    }

    /// Zero every score while preserving membership.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.score = 0;
        }
    }

    /// Participants ranked by score, descending. Ties keep join order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
            .into_iter()
            .map(|e| LeaderboardEntry {
                name: e.name,
                score: e.score,
                user_id: e.user_id,
                avatar: e.avatar,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
