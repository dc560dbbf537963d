//! Request/reply messages for the control connection.
//!
//! Each control frame is one JSON object tagged by `"Op"` and gets exactly
//! one [`Response`] back. Game connections receive [`Response`] values too:
//! snapshots after moves, errors after rejected moves.

use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, LobbyId, Roster, Symbol};

/// An operation requested over the control connection.
///
/// ```json
/// {"Op": "JoinLobby", "LobbyId": 12, "PlayerName": "Alice"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Op", rename_all_fields = "PascalCase")]
pub enum ControlRequest {
    /// Allocate a new lobby with a fresh game.
    CreateLobby,

    /// Seat `player_name` in the lobby.
    JoinLobby { lobby_id: LobbyId, player_name: String },

    /// Play a move on behalf of a seated player. The resulting snapshot
    /// is pushed to everyone else on the lobby's game connections.
    MakeMove {
        lobby_id: LobbyId,
        player_name: String,
        sector_row: i64,
        sector_col: i64,
        cell_row: i64,
        cell_col: i64,
    },

    /// Read the current game.
    GetGameState { lobby_id: LobbyId },

    /// Read the roster.
    GetLobbyState { lobby_id: LobbyId },

    /// Remove the lobby and drop its game connections.
    DeleteLobby { lobby_id: LobbyId },

    /// Remove one player and drop their game connection.
    DeletePlayer { lobby_id: LobbyId, player_name: String },
}

/// Every body the server sends.
///
/// Untagged: each variant is recognised by its shape. The four keyed
/// variants serialize as single-key objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// `{"LobbyId": n}`
    LobbyCreated {
        #[serde(rename = "LobbyId")]
        lobby_id: LobbyId,
    },
    /// `{"PlayerType": "X" | "O" | "None"}`
    Joined {
        #[serde(rename = "PlayerType")]
        player_type: Symbol,
    },
    /// `{"Success": "<message>"}`
    Success {
        #[serde(rename = "Success")]
        message: String,
    },
    /// `{"Error": "<message>"}`
    Error {
        #[serde(rename = "Error")]
        message: String,
    },
    /// A full game snapshot.
    Game(GameSnapshot),
    /// A lobby roster.
    Roster(Roster),
}

impl Response {
    /// Builds an error body.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Builds a success body.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// Returns `true` for `{"Error": ...}`.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::roster_entry;
    use serde_json::json;
    use ultimate_game::{GameState, Role};

    #[test]
    fn test_control_requests_parse() {
        let req: ControlRequest = serde_json::from_str(r#"{"Op":"CreateLobby"}"#).unwrap();
        assert_eq!(req, ControlRequest::CreateLobby);

        let req: ControlRequest =
            serde_json::from_str(r#"{"Op":"JoinLobby","LobbyId":12,"PlayerName":"Alice"}"#).unwrap();
        assert_eq!(
            req,
            ControlRequest::JoinLobby {
                lobby_id: LobbyId(12),
                player_name: "Alice".into()
            }
        );

        let req: ControlRequest = serde_json::from_str(
            r#"{"Op":"MakeMove","LobbyId":3,"PlayerName":"Bob","SectorRow":0,"SectorCol":1,"CellRow":2,"CellCol":0}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            ControlRequest::MakeMove {
                lobby_id: LobbyId(3),
                player_name: "Bob".into(),
                sector_row: 0,
                sector_col: 1,
                cell_row: 2,
                cell_col: 0,
            }
        );
    }

    #[test]
    fn test_control_request_missing_field_fails() {
        assert!(serde_json::from_str::<ControlRequest>(r#"{"Op":"JoinLobby","LobbyId":12}"#).is_err());
        assert!(serde_json::from_str::<ControlRequest>(r#"{"Op":"Launch"}"#).is_err());
        assert!(serde_json::from_str::<ControlRequest>(r#"{"LobbyId":12}"#).is_err());
    }

    #[test]
    fn test_control_request_serializes_with_op_tag() {
        let json = serde_json::to_value(ControlRequest::DeletePlayer {
            lobby_id: LobbyId(5),
            player_name: "Carl".into(),
        })
        .unwrap();
        assert_eq!(json, json!({"Op": "DeletePlayer", "LobbyId": 5, "PlayerName": "Carl"}));
    }

    #[test]
    fn test_keyed_response_shapes() {
        let cases = [
            (Response::LobbyCreated { lobby_id: LobbyId(9) }, json!({"LobbyId": 9})),
            (Response::Joined { player_type: Symbol::O }, json!({"PlayerType": "O"})),
            (Response::success("Lobby 9 removed."), json!({"Success": "Lobby 9 removed."})),
            (Response::error("Lobby is full."), json!({"Error": "Lobby is full."})),
        ];
        for (response, expected) in cases {
            assert_eq!(serde_json::to_value(&response).unwrap(), expected);
        }
    }

    #[test]
    fn test_responses_decode_by_shape() {
        let snapshot = GameSnapshot::from(&GameState::new());
        let roster = vec![roster_entry("Alice", Role::X)];
        for response in [
            Response::error("It's not your turn now."),
            Response::Joined { player_type: Symbol::None },
            Response::Game(snapshot),
            Response::Roster(roster),
            Response::Roster(Vec::new()),
        ] {
            let text = serde_json::to_string(&response).unwrap();
            assert_eq!(serde_json::from_str::<Response>(&text).unwrap(), response);
        }
    }

    #[test]
    fn test_is_error() {
        assert!(Response::error("x").is_error());
        assert!(!Response::success("x").is_error());
    }
}
