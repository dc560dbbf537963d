//! Message dispatcher: the only place that knows the wire format.
//!
//! Decodes inbound frames, calls into the lobby registry, and encodes what
//! goes back out. Handlers stay byte-agnostic; registries stay
//! JSON-agnostic.

use std::sync::Arc;

use serde::Deserialize;
use ultimate_game::{Move, Role};
use ultimate_lobby::LobbyRegistry;
use ultimate_protocol::{
    Codec, ControlRequest, GameSnapshot, JsonCodec, LobbyId, MoveRequest, Response, roster_entry,
};
use ultimate_transport::{ConnectionId, UpgradeRequest};

use crate::UltimateError;
use crate::connections::{ConnectionRegistry, Outbound, PeerSender};

/// Reply to a successful move.
pub const MOVE_COMPLETED: &str = "The move was completed successfully.";

/// Why a game connection was refused, sent before closing it.
const INVALID_PARAMS: &str = "Invalid params";
const LOBBY_NOT_FOUND: &str = "Lobby not found";

/// Query parameters of a game connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameParams {
    lobby_id: Option<i32>,
    player_name: Option<String>,
}

/// A game connection that passed the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub lobby_id: LobbyId,
    pub name: String,
    pub role: Role,
}

/// The result of opening a game connection.
#[derive(Debug)]
pub enum Handshake {
    /// Joined and registered; the current snapshot is already queued.
    Seated(Seat),
    /// Refused with this encoded error body.
    Refused(String),
}

/// Routes decoded requests to the registries and encodes the results.
///
/// Shared by every connection task behind an `Arc`.
pub struct Dispatcher {
    lobbies: Arc<LobbyRegistry>,
    connections: Arc<ConnectionRegistry>,
    codec: JsonCodec,
    reply_to_malformed: bool,
}

impl Dispatcher {
    pub fn new(
        lobbies: Arc<LobbyRegistry>,
        connections: Arc<ConnectionRegistry>,
        reply_to_malformed: bool,
    ) -> Self {
        Self {
            lobbies,
            connections,
            codec: JsonCodec,
            reply_to_malformed,
        }
    }

    pub fn lobbies(&self) -> &Arc<LobbyRegistry> {
        &self.lobbies
    }

    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    /// Encodes a response body.
    pub fn encode(&self, response: &Response) -> Result<String, UltimateError> {
        Ok(self.codec.encode(response)?)
    }

    // -----------------------------------------------------------------
    // Game connections
    // -----------------------------------------------------------------

    /// Validates a game connection's parameters, joins the player, and
    /// registers `sender` as their outbound queue.
    ///
    /// On success the current snapshot has been queued for the player.
    pub async fn open_game(
        &self,
        request: &UpgradeRequest,
        conn_id: ConnectionId,
        sender: PeerSender,
    ) -> Result<Handshake, UltimateError> {
        let Some((raw_id, name)) = request
            .params::<GameParams>()
            .ok()
            .and_then(|params| Some((params.lobby_id?, params.player_name?)))
            .filter(|(_, name)| !name.is_empty())
        else {
            return self.refuse(INVALID_PARAMS);
        };

        // Ids are positive, so a negative one names no lobby.
        let Some(lobby_id) = u32::try_from(raw_id).ok().map(LobbyId) else {
            return self.refuse(LOBBY_NOT_FOUND);
        };
        if !self.lobbies.contains(lobby_id).await {
            return self.refuse(LOBBY_NOT_FOUND);
        }
        let role = match self.lobbies.join_lobby(lobby_id, &name).await {
            Ok(role) => role,
            Err(e) => return self.refuse(e.to_string()),
        };

        if let Some(previous) = self
            .connections
            .register(lobby_id, &name, conn_id, sender)
            .await
        {
            tracing::debug!(%lobby_id, player = %name, %previous, "replaced stale connection");
        }

        match self.lobbies.game_snapshot(lobby_id).await {
            Ok(snapshot) => {
                let text = self.encode(&Response::Game(GameSnapshot::from(&snapshot.value)))?;
                self.connections
                    .unicast(lobby_id, &name, &Outbound::snapshot(snapshot.version, text))
                    .await;
            }
            Err(e) => {
                // Deleted between join and now.
                self.connections.unregister(lobby_id, &name, conn_id).await;
                return self.refuse(e.to_string());
            }
        }

        Ok(Handshake::Seated(Seat {
            lobby_id,
            name,
            role,
        }))
    }

    fn refuse(&self, message: impl Into<String>) -> Result<Handshake, UltimateError> {
        Ok(Handshake::Refused(self.encode(&Response::error(message))?))
    }

    /// Handles one inbound frame from a seated player.
    ///
    /// The seat, not the payload, decides who is moving. On success the
    /// new snapshot goes to everyone else in the lobby; on failure the
    /// error goes back to the mover alone.
    pub async fn game_frame(&self, seat: &Seat, data: &[u8]) -> Result<(), UltimateError> {
        let request: MoveRequest = match self.codec.decode(data) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(
                    lobby_id = %seat.lobby_id,
                    player = %seat.name,
                    error = %e,
                    "malformed move request"
                );
                if self.reply_to_malformed {
                    let text = self.encode(&Response::error(format!("Malformed request: {e}")))?;
                    self.connections
                        .unicast(seat.lobby_id, &seat.name, &Outbound::unversioned(text))
                        .await;
                }
                return Ok(());
            }
        };

        let response = self
            .play(seat.lobby_id, &seat.name, request.to_move())
            .await?;
        if response.is_error() {
            let text = self.encode(&response)?;
            self.connections
                .unicast(seat.lobby_id, &seat.name, &Outbound::unversioned(text))
                .await;
        }
        Ok(())
    }

    /// Plays a move and pushes the resulting snapshot to everyone in the
    /// lobby but the mover.
    async fn play(&self, lobby_id: LobbyId, name: &str, mv: Move) -> Result<Response, UltimateError> {
        let snapshot = match self.lobbies.make_move(lobby_id, name, mv).await {
            Ok(snapshot) => snapshot,
            Err(e) => return Ok(Response::error(e.to_string())),
        };

        let text = self.encode(&Response::Game(GameSnapshot::from(&snapshot.value)))?;
        let reached = self
            .connections
            .broadcast_except(lobby_id, name, &Outbound::snapshot(snapshot.version, text))
            .await;
        tracing::trace!(%lobby_id, player = %name, version = snapshot.version, reached, "snapshot pushed");

        Ok(Response::success(MOVE_COMPLETED))
    }

    // -----------------------------------------------------------------
    // Control connections
    // -----------------------------------------------------------------

    /// Handles one control frame and returns the encoded reply.
    pub async fn control_frame(&self, data: &[u8]) -> Result<String, UltimateError> {
        let response = match self.codec.decode::<ControlRequest>(data) {
            Ok(request) => self.control(request).await?,
            Err(e) => {
                tracing::debug!(error = %e, "malformed control request");
                Response::error(format!("Malformed request: {e}"))
            }
        };
        self.encode(&response)
    }

    /// Executes a control request.
    pub async fn control(&self, request: ControlRequest) -> Result<Response, UltimateError> {
        let response = match request {
            ControlRequest::CreateLobby => Response::LobbyCreated {
                lobby_id: self.lobbies.create_lobby().await,
            },

            ControlRequest::JoinLobby {
                lobby_id,
                player_name,
            } => match self.lobbies.join_lobby(lobby_id, &player_name).await {
                Ok(role) => Response::Joined {
                    player_type: role.into(),
                },
                Err(e) => Response::error(e.to_string()),
            },

            ControlRequest::MakeMove {
                lobby_id,
                player_name,
                sector_row,
                sector_col,
                cell_row,
                cell_col,
            } => {
                let mv = MoveRequest::new(sector_row, sector_col, cell_row, cell_col);
                self.play(lobby_id, &player_name, mv.to_move()).await?
            }

            ControlRequest::GetGameState { lobby_id } => {
                match self.lobbies.game_snapshot(lobby_id).await {
                    Ok(snapshot) => Response::Game(GameSnapshot::from(&snapshot.value)),
                    Err(e) => Response::error(e.to_string()),
                }
            }

            ControlRequest::GetLobbyState { lobby_id } => match self.lobbies.roster(lobby_id).await {
                Ok(players) => Response::Roster(
                    players
                        .into_iter()
                        .map(|p| roster_entry(p.name, p.role))
                        .collect(),
                ),
                Err(e) => Response::error(e.to_string()),
            },

            ControlRequest::DeleteLobby { lobby_id } => match self.lobbies.delete_lobby(lobby_id).await {
                Ok(()) => {
                    self.connections.drop_lobby(lobby_id).await;
                    Response::success(format!("Lobby {lobby_id} removed."))
                }
                Err(e) => Response::error(e.to_string()),
            },

            ControlRequest::DeletePlayer {
                lobby_id,
                player_name,
            } => {
                // Close the socket while the name is still taken, so a
                // reconnect under it cannot be registered and then dropped.
                self.connections.disconnect(lobby_id, &player_name).await;
                match self.lobbies.leave_lobby(lobby_id, &player_name).await {
                    Ok(()) => Response::success(format!(
                        "Player {player_name} removed from lobby {lobby_id}."
                    )),
                    Err(e) => Response::error(e.to_string()),
                }
            }
        };
        Ok(response)
    }
}
