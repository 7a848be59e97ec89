//! Live quiz sessions and connection fan-out.
//!
//! The registry owns every running quiz and the bindings between live
//! connections and the quiz they are viewing. Each quiz sits behind its own
//! `tokio::sync::Mutex`, so concurrent messages for the same quiz apply as
//! a strict sequence while different quizzes never contend; the maps
//! themselves are sharded `DashMap`s, safe for concurrent lookup, insert,
//! and removal.

mod errors;
mod quiz_game;
mod scoreboard;

pub use errors::QuizError;
pub use quiz_game::{AdvanceOutcome, QuizGame};
pub use scoreboard::Scoreboard;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};

use quizcast_domain::{Participant, Question, QuizId};
use quizcast_protocol::{GameSummary, ServerMessage};

/// Unique identifier for a connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live connection: resolved identity, outbound channel, and the quiz it
/// is currently bound to (at most one at a time).
#[derive(Debug, Clone)]
struct ConnectionHandle {
    participant: Participant,
    sender: mpsc::Sender<ServerMessage>,
    quiz_id: Option<QuizId>,
}

/// Owns the set of live quizzes and the connections-to-quiz relation.
///
/// Constructed explicitly and handed to the API layer; there is no ambient
/// global. Quiz and scoreboard state is reachable only through the per-quiz
/// lock held in `games`, so no caller can mutate a quiz outside it.
pub struct GameRegistry {
    games: DashMap<QuizId, Arc<Mutex<QuizGame>>>,
    connections: DashMap<ClientId, ConnectionHandle>,
    /// Quizzes with zero bound connections, stamped for the TTL sweeper.
    empty_since: DashMap<QuizId, Instant>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
            connections: DashMap::new(),
            empty_since: DashMap::new(),
        }
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Track a new connection with its resolved identity and outbound channel.
    pub fn register(
        &self,
        client_id: ClientId,
        participant: Participant,
        sender: mpsc::Sender<ServerMessage>,
    ) {
        self.connections.insert(
            client_id,
            ConnectionHandle {
                participant,
                sender,
                quiz_id: None,
            },
        );
        tracing::debug!(client_id = %client_id, "Connection registered");
    }

    /// Drop a connection. The participant stays on any roster they joined;
    /// membership only ends with an explicit leave, so a reconnect with the
    /// same user id resumes where it left off.
    pub fn unregister(&self, client_id: ClientId) {
        let bound = self
            .connections
            .remove(&client_id)
            .and_then(|(_, handle)| handle.quiz_id);
        if let Some(quiz_id) = bound {
            self.stamp_if_unwatched(quiz_id);
        }
        tracing::debug!(client_id = %client_id, "Connection unregistered");
    }

    pub fn is_connected(&self, client_id: ClientId) -> bool {
        self.connections.contains_key(&client_id)
    }

    pub fn participant(&self, client_id: ClientId) -> Option<Participant> {
        self.connections
            .get(&client_id)
            .map(|handle| handle.participant.clone())
    }

    /// The quiz this connection is currently viewing, if any.
    pub fn bound_quiz(&self, client_id: ClientId) -> Option<QuizId> {
        self.connections.get(&client_id).and_then(|h| h.quiz_id)
    }

    /// Bind a connection to a quiz, replacing any previous binding.
    pub fn bind(&self, client_id: ClientId, quiz_id: QuizId) {
        let previous = {
            let mut handle = match self.connections.get_mut(&client_id) {
                Some(handle) => handle,
                None => return,
            };
            handle.quiz_id.replace(quiz_id)
        };
        self.empty_since.remove(&quiz_id);
        if let Some(previous) = previous.filter(|p| *p != quiz_id) {
            self.stamp_if_unwatched(previous);
        }
    }

    /// Remove a connection's quiz binding without dropping the connection.
    pub fn unbind(&self, client_id: ClientId) {
        let previous = {
            let mut handle = match self.connections.get_mut(&client_id) {
                Some(handle) => handle,
                None => return,
            };
            handle.quiz_id.take()
        };
        if let Some(quiz_id) = previous {
            self.stamp_if_unwatched(quiz_id);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // =========================================================================
    // Games
    // =========================================================================

    /// Create and register a new quiz, binding the creator's connection to
    /// it. The question list is validated here and frozen afterwards.
    pub fn create_game(
        &self,
        client_id: ClientId,
        quiz_name: impl Into<String>,
        admin: Participant,
        questions: Vec<Question>,
    ) -> Result<QuizId, QuizError> {
        let game = QuizGame::new(quiz_name, admin, questions)?;
        let quiz_id = game.id();
        self.games.insert(quiz_id, Arc::new(Mutex::new(game)));
        self.bind(client_id, quiz_id);
        tracing::info!(quiz_id = %quiz_id, "Created new game");
        Ok(quiz_id)
    }

    /// Look up a quiz. A miss is a normal outcome (stale or mistyped id),
    /// not an error condition.
    pub fn find_game(&self, quiz_id: QuizId) -> Option<Arc<Mutex<QuizGame>>> {
        self.games.get(&quiz_id).map(|entry| Arc::clone(&entry))
    }

    /// Evict a quiz and unbind every connection watching it.
    pub fn remove_game(&self, quiz_id: QuizId) {
        self.games.remove(&quiz_id);
        self.empty_since.remove(&quiz_id);
        for mut entry in self.connections.iter_mut() {
            if entry.quiz_id == Some(quiz_id) {
                entry.quiz_id = None;
            }
        }
        tracing::info!(quiz_id = %quiz_id, "Removed game");
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Compact summaries of every registered quiz.
    pub async fn list_games(&self) -> Vec<GameSummary> {
        let games: Vec<Arc<Mutex<QuizGame>>> = self
            .games
            .iter()
            .map(|entry| Arc::clone(&entry))
            .collect();

        let mut summaries = Vec::with_capacity(games.len());
        for game in games {
            summaries.push(game.lock().await.summary());
        }
        summaries
    }

    pub async fn find_summary(&self, quiz_id: QuizId) -> Option<GameSummary> {
        let game = self.find_game(quiz_id)?;
        let summary = game.lock().await.summary();
        Some(summary)
    }

    // =========================================================================
    // Fan-out
    // =========================================================================

    /// Deliver a message to every connection bound to a quiz.
    ///
    /// Iterates a stable snapshot of the bindings, so concurrent binds and
    /// removals are safe. Delivery is fire-and-forget per connection: a
    /// full or closed outbound queue disconnects that client (a client
    /// that missed a state snapshot can no longer render a consistent
    /// view) and never delays the rest.
    pub fn broadcast(&self, quiz_id: QuizId, message: &ServerMessage) {
        let targets: Vec<(ClientId, mpsc::Sender<ServerMessage>)> = self
            .connections
            .iter()
            .filter(|entry| entry.quiz_id == Some(quiz_id))
            .map(|entry| (*entry.key(), entry.sender.clone()))
            .collect();

        let mut dropped = false;
        for (client_id, sender) in targets {
            match sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        client_id = %client_id,
                        quiz_id = %quiz_id,
                        "Outbound queue full, disconnecting slow consumer"
                    );
                    self.connections.remove(&client_id);
                    dropped = true;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(client_id = %client_id, "Outbound channel closed, dropping connection");
                    self.connections.remove(&client_id);
                    dropped = true;
                }
            }
        }
        if dropped {
            self.stamp_if_unwatched(quiz_id);
        }
    }

    /// Targeted reply to a single connection; best-effort.
    pub fn send_to(&self, client_id: ClientId, message: &ServerMessage) {
        let sender = match self.connections.get(&client_id) {
            Some(handle) => handle.sender.clone(),
            None => return,
        };
        if let Err(e) = sender.try_send(message.clone()) {
            tracing::warn!(client_id = %client_id, error = %e, "Failed to send message to client");
        }
    }

    // =========================================================================
    // Empty-game retention
    // =========================================================================

    /// Remove quizzes that have had zero bound connections for longer than
    /// `ttl`. Returns the evicted ids.
    pub fn sweep_empty(&self, ttl: Duration) -> Vec<QuizId> {
        let expired: Vec<QuizId> = self
            .empty_since
            .iter()
            .filter(|entry| entry.value().elapsed() >= ttl)
            .map(|entry| *entry.key())
            .collect();

        for quiz_id in &expired {
            tracing::info!(quiz_id = %quiz_id, "Sweeping game with no remaining connections");
            self.remove_game(*quiz_id);
        }
        expired
    }

    /// Stamp a quiz as empty if no connection is bound to it anymore.
    fn stamp_if_unwatched(&self, quiz_id: QuizId) {
        if !self.games.contains_key(&quiz_id) {
            return;
        }
        let watched = self
            .connections
            .iter()
            .any(|entry| entry.quiz_id == Some(quiz_id));
        if !watched {
            self.empty_since.insert(quiz_id, Instant::now());
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
