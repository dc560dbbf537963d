//! `UltimateServer` builder and accept loop.
//!
//! Ties the layers together: transport → dispatcher → lobby and
//! connection registries.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ultimate_lobby::{LobbyConfig, LobbyRegistry};
use ultimate_transport::{Transport, WebSocketTransport};

use crate::UltimateError;
use crate::connections::ConnectionRegistry;
use crate::dispatch::Dispatcher;
use crate::handler::handle_connection;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Settings for every lobby.
    pub lobby: LobbyConfig,
    /// Answer malformed move payloads with an error instead of dropping
    /// them.
    pub reply_to_malformed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            lobby: LobbyConfig::default(),
            reply_to_malformed: false,
        }
    }
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use ultimate::prelude::*;
///
/// # async fn start() -> Result<(), UltimateError> {
/// let server = UltimateServer::builder()
///     .bind("0.0.0.0:8080")
///     .lobby_config(LobbyConfig {
///         allow_spectators: true,
///         ..LobbyConfig::default()
///     })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UltimateServerBuilder {
    config: ServerConfig,
}

impl UltimateServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a complete configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the lobby configuration.
    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.config.lobby = config;
        self
    }

    /// Whether malformed move payloads get an error reply.
    pub fn reply_to_malformed(mut self, reply: bool) -> Self {
        self.config.reply_to_malformed = reply;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<UltimateServer, UltimateError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(LobbyRegistry::new(self.config.lobby)),
            Arc::new(ConnectionRegistry::new()),
            self.config.reply_to_malformed,
        ));

        Ok(UltimateServer {
            transport,
            dispatcher,
        })
    }
}

/// A bound server, ready to accept connections.
pub struct UltimateServer {
    transport: WebSocketTransport,
    dispatcher: Arc<Dispatcher>,
}

impl UltimateServer {
    /// Creates a new builder.
    pub fn builder() -> UltimateServerBuilder {
        UltimateServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The lobby registry behind this server.
    pub fn lobbies(&self) -> Arc<LobbyRegistry> {
        Arc::clone(self.dispatcher.lobbies())
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), UltimateError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Each accepted stream is upgraded and handled on its own task.
    /// Connections already open keep running after shutdown.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), UltimateError> {
        tracing::info!(addr = ?self.local_addr().ok(), "ultimate server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                accepted = self.transport.accept_stream() => match accepted {
                    Ok((stream, addr)) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        tokio::spawn(async move {
                            let conn = match WebSocketTransport::upgrade(stream, addr).await {
                                Ok(conn) => conn,
                                Err(e) => {
                                    tracing::warn!(%addr, error = %e, "upgrade failed");
                                    return;
                                }
                            };
                            if let Err(e) = handle_connection(conn, dispatcher).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        self.transport.shutdown().await?;
        Ok(())
    }
}
