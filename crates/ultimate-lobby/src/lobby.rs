//! Lobby actor: a Tokio task that owns one roster and one game.
//!
//! The outside world talks to it through [`LobbyHandle`]; every command
//! carries a oneshot reply channel.

use tokio::sync::{mpsc, oneshot};
use ultimate_game::{GameState, Move, Role};
use ultimate_protocol::LobbyId;

use crate::{Admission, LobbyConfig, LobbyError, Player, assign_role};

/// A value paired with the number of moves played when it was taken.
///
/// Versions only grow, so a receiver can discard anything older than what
/// it already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

impl Versioned<GameState> {
    fn of(game: &GameState) -> Self {
        Self {
            version: game.moves_played(),
            value: game.clone(),
        }
    }
}

/// Whether the actor stopped itself after a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeaveOutcome {
    Stayed,
    Reaped,
}

pub(crate) enum LobbyCommand {
    Join {
        name: String,
        reply: oneshot::Sender<Result<Role, LobbyError>>,
    },
    Leave {
        name: String,
        reply: oneshot::Sender<Result<LeaveOutcome, LobbyError>>,
    },
    Move {
        name: String,
        mv: Move,
        reply: oneshot::Sender<Result<Versioned<GameState>, LobbyError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Versioned<GameState>>,
    },
    Roster {
        reply: oneshot::Sender<Vec<Player>>,
    },
    Shutdown,
}

/// Handle to a running lobby actor. Cheap to clone.
#[derive(Clone)]
pub(crate) struct LobbyHandle {
    lobby_id: LobbyId,
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Returns `true` if both handles talk to the same actor.
    pub(crate) fn same_lobby(&self, other: &Self) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Sends a command and waits for its reply. A stopped actor means
    /// the lobby is gone.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> LobbyCommand,
    ) -> Result<T, LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| LobbyError::NotFound(self.lobby_id))?;
        reply_rx
            .await
            .map_err(|_| LobbyError::NotFound(self.lobby_id))
    }

    pub(crate) async fn join(&self, name: String) -> Result<Role, LobbyError> {
        self.request(|reply| LobbyCommand::Join { name, reply }).await?
    }

    pub(crate) async fn leave(&self, name: String) -> Result<LeaveOutcome, LobbyError> {
        self.request(|reply| LobbyCommand::Leave { name, reply }).await?
    }

    pub(crate) async fn make_move(
        &self,
        name: String,
        mv: Move,
    ) -> Result<Versioned<GameState>, LobbyError> {
        self.request(|reply| LobbyCommand::Move { name, mv, reply })
            .await?
    }

    pub(crate) async fn snapshot(&self) -> Result<Versioned<GameState>, LobbyError> {
        self.request(|reply| LobbyCommand::Snapshot { reply }).await
    }

    pub(crate) async fn roster(&self) -> Result<Vec<Player>, LobbyError> {
        self.request(|reply| LobbyCommand::Roster { reply }).await
    }

    /// Tells the lobby to stop. Commands queued ahead of this still run;
    /// any sent after it fail with `NotFound`.
    pub(crate) async fn shutdown(&self) {
        let _ = self.sender.send(LobbyCommand::Shutdown).await;
    }
}

/// The actor state. Lives inside its task.
struct LobbyActor {
    lobby_id: LobbyId,
    config: LobbyConfig,
    /// Join order.
    players: Vec<Player>,
    game: GameState,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl LobbyActor {
    async fn run(mut self) {
        tracing::debug!(lobby_id = %self.lobby_id, "lobby actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Join { name, reply } => {
                    let _ = reply.send(self.handle_join(name));
                }
                LobbyCommand::Leave { name, reply } => {
                    let result = self.handle_leave(&name);
                    let reaped = matches!(result, Ok(LeaveOutcome::Reaped));
                    let _ = reply.send(result);
                    if reaped {
                        break;
                    }
                }
                LobbyCommand::Move { name, mv, reply } => {
                    let _ = reply.send(self.handle_move(&name, mv));
                }
                LobbyCommand::Snapshot { reply } => {
                    let _ = reply.send(Versioned::of(&self.game));
                }
                LobbyCommand::Roster { reply } => {
                    let _ = reply.send(self.players.clone());
                }
                LobbyCommand::Shutdown => break,
            }
        }

        tracing::debug!(lobby_id = %self.lobby_id, "lobby actor stopped");
    }

    fn handle_join(&mut self, name: String) -> Result<Role, LobbyError> {
        if self.players.iter().any(|p| p.name == name) {
            return Err(LobbyError::NameTaken(name));
        }
        let role = match assign_role(&self.players, &self.config) {
            Admission::Seat(role) => role,
            Admission::Rejected => return Err(LobbyError::LobbyFull(self.lobby_id)),
        };

        tracing::info!(
            lobby_id = %self.lobby_id,
            player = %name,
            %role,
            players = self.players.len() + 1,
            "player joined"
        );
        self.players.push(Player { name, role });
        Ok(role)
    }

    fn handle_leave(&mut self, name: &str) -> Result<LeaveOutcome, LobbyError> {
        let index = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LobbyError::PlayerNotFound(name.to_string()))?;
        let player = self.players.remove(index);

        tracing::info!(
            lobby_id = %self.lobby_id,
            player = %player.name,
            role = %player.role,
            players = self.players.len(),
            "player left"
        );

        if self.players.is_empty() && self.config.reap_empty_lobbies {
            Ok(LeaveOutcome::Reaped)
        } else {
            Ok(LeaveOutcome::Stayed)
        }
    }

    fn handle_move(&mut self, name: &str, mv: Move) -> Result<Versioned<GameState>, LobbyError> {
        let role = self
            .players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.role)
            .ok_or_else(|| LobbyError::PlayerNotFound(name.to_string()))?;

        if let Err(reason) = self.game.apply_move(mv, role.mark()) {
            tracing::debug!(
                lobby_id = %self.lobby_id,
                player = %name,
                ?mv,
                %reason,
                "move rejected"
            );
            return Err(reason.into());
        }

        if let Some(outcome) = self.game.winner() {
            tracing::info!(
                lobby_id = %self.lobby_id,
                ?outcome,
                moves = self.game.moves_played(),
                "game finished"
            );
        }
        Ok(Versioned::of(&self.game))
    }
}

/// Spawns a lobby actor and returns a handle to it.
///
/// `config.channel_size` bounds the command queue; senders wait when it is
/// full.
pub(crate) fn spawn_lobby(lobby_id: LobbyId, config: LobbyConfig) -> LobbyHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = LobbyActor {
        lobby_id,
        config,
        players: Vec::new(),
        game: GameState::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    LobbyHandle {
        lobby_id,
        sender: tx,
    }
}
