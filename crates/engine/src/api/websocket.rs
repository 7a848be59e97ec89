//! WebSocket handling for quiz clients.
//!
//! One task pair per connection: the reader loop decodes inbound messages
//! and dispatches each to exactly one registry/game operation; a forward
//! task drains the bounded outbound queue into the socket. Overflowing the
//! queue disconnects the client (see `GameRegistry::broadcast`).

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use quizcast_domain::{Difficulty, Participant, QuizId};
use quizcast_protocol::{ClientMessage, ServerMessage};

use crate::app::App;
use crate::results::GameResult;
use crate::session::{AdvanceOutcome, ClientId, QuizError};

/// Buffer size for per-connection outbound channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Identity fields resolved by the upstream auth layer and forwarded as
/// query parameters. Connections without them get a throwaway guest
/// identity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityQuery {
    user_id: Option<String>,
    name: Option<String>,
    avatar: Option<String>,
}

impl IdentityQuery {
    fn into_participant(self) -> Participant {
        Participant {
            user_id: self
                .user_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name.unwrap_or_else(|| "Guest".to_string()),
            avatar: self.avatar.unwrap_or_default(),
        }
    }
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(identity): Query<IdentityQuery>,
    State(app): State<Arc<App>>,
) -> Response {
    let participant = identity.into_participant();
    ws.on_upgrade(move |socket| handle_socket(socket, app, participant))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>, participant: Participant) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    app.registry.register(client_id, participant.clone(), tx.clone());

    tracing::info!(
        client_id = %client_id,
        user_id = %participant.user_id,
        "WebSocket connection established"
    );

    // Forward queued messages to the socket until the channel or socket dies.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            // Socket send failed; nothing more to deliver.
            _ = &mut send_task => break,
            inbound = ws_receiver.next() => {
                let Some(result) = inbound else { break };
                match result {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => {
                                if let Some(response) = handle_message(msg, &app, client_id).await {
                                    if tx.try_send(response).is_err() {
                                        tracing::warn!(
                                            client_id = %client_id,
                                            "Outbound queue full or closed, disconnecting"
                                        );
                                        break;
                                    }
                                }
                                // Broadcast overflow may have evicted us.
                                if !app.registry.is_connected(client_id) {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(client_id = %client_id, error = %e, "Failed to parse message");
                                let alert = ServerMessage::GameAlert {
                                    message: format!("Invalid message: {e}"),
                                };
                                let _ = tx.try_send(alert);
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!(client_id = %client_id, "WebSocket closed by client");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(client_id = %client_id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // Disconnect-without-leave: the binding goes away but roster membership
    // persists, so the same identity can reconnect and resume.
    app.registry.unregister(client_id);
    send_task.abort();

    tracing::info!(client_id = %client_id, "WebSocket connection terminated");
}

/// Dispatch a parsed client message to the appropriate operation.
///
/// The returned message, if any, goes to the originating connection only;
/// state-changing successes broadcast a fresh snapshot from in here.
async fn handle_message(
    msg: ClientMessage,
    app: &Arc<App>,
    client_id: ClientId,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::InitGame {
            quiz_name,
            questions,
        } => {
            let participant = app.registry.participant(client_id)?;
            match app
                .registry
                .create_game(client_id, quiz_name, participant, questions)
            {
                Ok(quiz_id) => {
                    app.registry.send_to(
                        client_id,
                        &ServerMessage::GameAdded {
                            quiz_id: quiz_id.to_string(),
                        },
                    );
                    broadcast_state(app, quiz_id).await;
                    None
                }
                Err(e) => Some(alert(e)),
            }
        }

        ClientMessage::JoinGame { quiz_id } => {
            let Ok(quiz_id) = quiz_id.parse::<QuizId>() else {
                return Some(ServerMessage::GameAlert {
                    message: format!("Game not found: {quiz_id}"),
                });
            };
            let Some(game) = app.registry.find_game(quiz_id) else {
                return Some(ServerMessage::GameAlert {
                    message: format!("Game not found: {quiz_id}"),
                });
            };
            let participant = app.registry.participant(client_id)?;

            let mut game = game.lock().await;
            if game.is_member(&participant.user_id) {
                // Reconnect path: rebind so this connection resumes
                // receiving broadcasts, then tell only the sender.
                app.registry.bind(client_id, quiz_id);
                app.registry.send_to(
                    client_id,
                    &ServerMessage::GameState {
                        data: game.state_view(),
                    },
                );
                return Some(alert(QuizError::AlreadyJoined(participant.name)));
            }
            match game.add_participant(participant) {
                Ok(()) => {
                    let view = game.state_view();
                    drop(game);
                    app.registry.bind(client_id, quiz_id);
                    app.registry
                        .broadcast(quiz_id, &ServerMessage::GameState { data: view });
                    None
                }
                Err(e) => Some(alert(e)),
            }
        }

        ClientMessage::ListGames => Some(ServerMessage::GamesList {
            games: app.registry.list_games().await,
        }),

        ClientMessage::LeaveGame => {
            let quiz_id = bound_or_alert(app, client_id)?;
            let game = app.registry.find_game(quiz_id)?;
            let participant = app.registry.participant(client_id)?;

            let view = {
                let mut game = game.lock().await;
                game.remove_participant(&participant.user_id);
                game.state_view()
            };
            app.registry.unbind(client_id);
            app.registry
                .broadcast(quiz_id, &ServerMessage::GameState { data: view });
            None
        }

        ClientMessage::StartGame => {
            let quiz_id = bound_or_alert(app, client_id)?;
            let game = app.registry.find_game(quiz_id)?;
            let participant = app.registry.participant(client_id)?;

            let mut game = game.lock().await;
            match game.start_as(&participant.user_id) {
                Ok(()) => {
                    let view = game.state_view();
                    drop(game);
                    app.registry
                        .broadcast(quiz_id, &ServerMessage::GameState { data: view });
                    None
                }
                // A non-admin start attempt is visible to the whole room.
                Err(e @ QuizError::NotAdmin) => {
                    drop(game);
                    app.registry.broadcast(quiz_id, &alert(e));
                    None
                }
                Err(e) => Some(alert(e)),
            }
        }

        ClientMessage::AnswerQuestion {
            answer_index,
            elapsed_millis,
            difficulty,
        } => {
            let quiz_id = bound_or_alert(app, client_id)?;
            let game = app.registry.find_game(quiz_id)?;
            let participant = app.registry.participant(client_id)?;
            let difficulty = difficulty
                .as_deref()
                .map(Difficulty::parse)
                .unwrap_or_default();

            let mut game = game.lock().await;
            let applied =
                game.submit_answer(&participant.user_id, answer_index, elapsed_millis, difficulty);
            if applied {
                let view = game.state_view();
                drop(game);
                app.registry
                    .broadcast(quiz_id, &ServerMessage::GameState { data: view });
            }
            None
        }

        ClientMessage::NextQuestion => {
            let quiz_id = bound_or_alert(app, client_id)?;
            let game = app.registry.find_game(quiz_id)?;

            let mut game = game.lock().await;
            let outcome = game.advance_question();
            if outcome == AdvanceOutcome::AlreadyFinished {
                return None;
            }
            let view = game.state_view();
            let results = match outcome {
                AdvanceOutcome::JustFinished => {
                    Some(GameResult::from_leaderboard(quiz_id, &view.leaderboard))
                }
                _ => None,
            };
            drop(game);

            app.registry
                .broadcast(quiz_id, &ServerMessage::GameState { data: view });

            if let Some(results) = results {
                let sink = Arc::clone(&app.results);
                tokio::spawn(async move {
                    if let Err(e) = sink.publish(results).await {
                        tracing::error!(quiz_id = %quiz_id, error = %e, "Failed to publish game results");
                    }
                });
            }
            None
        }
    }
}

/// Broadcast a fresh snapshot of a quiz to everyone bound to it.
async fn broadcast_state(app: &Arc<App>, quiz_id: QuizId) {
    let Some(game) = app.registry.find_game(quiz_id) else {
        return;
    };
    let view = game.lock().await.state_view();
    app.registry
        .broadcast(quiz_id, &ServerMessage::GameState { data: view });
}

fn alert(e: QuizError) -> ServerMessage {
    ServerMessage::GameAlert {
        message: e.to_string(),
    }
}

/// Resolve the sender's bound quiz, or queue an alert and yield `None`.
fn bound_or_alert(app: &Arc<App>, client_id: ClientId) -> Option<QuizId> {
    match app.registry.bound_quiz(client_id) {
        Some(quiz_id) => Some(quiz_id),
        None => {
            app.registry.send_to(
                client_id,
                &ServerMessage::GameAlert {
                    message: "You have not joined a game".to_string(),
                },
            );
            None
        }
    }
}
