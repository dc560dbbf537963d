//! Per-connection handler: routing by upgrade path, then the read loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//!   - `/ws`: handshake → join → register → push snapshot → read moves
//!   - `/control`: read requests, answer each one
//!   - anything else: error and close

use std::sync::Arc;

use tokio::sync::mpsc;
use ultimate_protocol::Response;
use ultimate_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::UltimateError;
use crate::dispatch::{Dispatcher, Handshake, Seat};

/// Upgrade path for players' game connections.
pub const GAME_PATH: &str = "/ws";
/// Upgrade path for the request/reply control connection.
pub const CONTROL_PATH: &str = "/control";

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), UltimateError> {
    let conn_id = conn.id();
    let path = conn.request().path().to_owned();
    match path.as_str() {
        GAME_PATH => handle_game(Arc::new(conn), dispatcher).await,
        CONTROL_PATH => handle_control(conn, dispatcher).await,
        path => {
            tracing::debug!(%conn_id, %path, "unknown upgrade path");
            let text = dispatcher.encode(&Response::error("Unknown path"))?;
            conn.send(&text).await?;
            let _ = conn.close().await;
            Ok(())
        }
    }
}

async fn handle_game(
    conn: Arc<WebSocketConnection>,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), UltimateError> {
    let conn_id = conn.id();
    let (tx, rx) = mpsc::unbounded_channel();

    let seat = match dispatcher.open_game(conn.request(), conn_id, tx).await? {
        Handshake::Seated(seat) => seat,
        Handshake::Refused(text) => {
            tracing::debug!(%conn_id, reply = %text, "game connection refused");
            conn.send(&text).await?;
            let _ = conn.close().await;
            return Ok(());
        }
    };
    tracing::info!(
        %conn_id,
        lobby_id = %seat.lobby_id,
        player = %seat.name,
        role = %seat.role,
        "player connected"
    );

    let mut writer = tokio::spawn(write_loop(Arc::clone(&conn), rx));

    loop {
        tokio::select! {
            frame = conn.recv() => match frame {
                Ok(Some(data)) => {
                    if let Err(e) = dispatcher.game_frame(&seat, &data).await {
                        tracing::debug!(%conn_id, error = %e, "dispatch failed");
                        break;
                    }
                }
                Ok(None) => {
                    tracing::debug!(%conn_id, "connection closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "recv error");
                    break;
                }
            },
            // The registry dropped our queue (player or lobby deleted,
            // or the socket stopped accepting writes).
            _ = &mut writer => {
                tracing::debug!(%conn_id, "outbound queue closed");
                break;
            }
        }
    }

    disconnect(&dispatcher, &seat, conn_id).await;
    Ok(())
}

/// Drains the outbound queue into the socket until the queue closes or a
/// send fails, then closes the socket.
async fn write_loop(conn: Arc<WebSocketConnection>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = rx.recv().await {
        if let Err(e) = conn.send(&text).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed");
            break;
        }
    }
    let _ = conn.close().await;
}

/// Releases the seat, unless a newer connection or a delete already took
/// it over.
async fn disconnect(dispatcher: &Dispatcher, seat: &Seat, conn_id: ConnectionId) {
    let owned = dispatcher
        .connections()
        .unregister(seat.lobby_id, &seat.name, conn_id)
        .await;
    if owned {
        if let Err(e) = dispatcher.lobbies().leave_lobby(seat.lobby_id, &seat.name).await {
            tracing::debug!(%conn_id, error = %e, "leave after disconnect failed");
        }
    }
    tracing::info!(
        %conn_id,
        lobby_id = %seat.lobby_id,
        player = %seat.name,
        "player disconnected"
    );
}

async fn handle_control(
    conn: WebSocketConnection,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), UltimateError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "control connection opened");

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };
        let reply = dispatcher.control_frame(&data).await?;
        conn.send(&reply).await?;
    }

    tracing::debug!(%conn_id, "control connection closed");
    Ok(())
}
