//! Final-score hand-off to an external durable store.
//!
//! When a quiz finishes the router hands the final leaderboard to whatever
//! sink was composed into the app. The call is fire-and-forget: a sink
//! failure is logged and never reaches the broadcast path.

use async_trait::async_trait;
use serde::Serialize;

use quizcast_domain::QuizId;
use quizcast_protocol::LeaderboardEntry;

/// One participant's final score for a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub quiz_id: String,
    pub user_id: String,
    pub name: String,
    pub avatar: String,
    pub score: i64,
}

impl GameResult {
    pub fn from_leaderboard(quiz_id: QuizId, leaderboard: &[LeaderboardEntry]) -> Vec<Self> {
        leaderboard
            .iter()
            .map(|entry| GameResult {
                quiz_id: quiz_id.to_string(),
                user_id: entry.user_id.clone(),
                name: entry.name.clone(),
                avatar: entry.avatar.clone(),
                score: entry.score,
            })
            .collect()
    }
}

/// Write-only destination for finished-game results.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    async fn publish(&self, results: Vec<GameResult>) -> anyhow::Result<()>;
}

/// Default sink: structured log records only. Stands in for the external
/// event pipeline in local runs.
pub struct LogResultsSink;

#[async_trait]
impl ResultsSink for LogResultsSink {
    async fn publish(&self, results: Vec<GameResult>) -> anyhow::Result<()> {
        for result in &results {
            tracing::info!(
                quiz_id = %result.quiz_id,
                user_id = %result.user_id,
                score = result.score,
                "Game finished, recording final score"
            );
        }
        Ok(())
    }
}

/// Test sink that forwards every batch over a channel so assertions can
/// observe exactly what was published.
pub struct ChannelResultsSink {
    tx: tokio::sync::mpsc::UnboundedSender<Vec<GameResult>>,
}

impl ChannelResultsSink {
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<Vec<GameResult>>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ResultsSink for ChannelResultsSink {
    async fn publish(&self, results: Vec<GameResult>) -> anyhow::Result<()> {
        self.tx
            .send(results)
            .map_err(|_| anyhow::anyhow!("results receiver dropped"))
    }
}
