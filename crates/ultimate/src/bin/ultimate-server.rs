//! Command-line entry point for the ultimate tic-tac-toe server.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ultimate::prelude::*;

/// Ultimate tic-tac-toe game server
#[derive(Parser, Debug)]
#[command(name = "ultimate-server")]
#[command(about = "Server-authoritative ultimate tic-tac-toe over WebSockets", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "ULTIMATE_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Seat joiners beyond X and O as spectators instead of rejecting them
    #[arg(long, env = "ULTIMATE_ALLOW_SPECTATORS")]
    allow_spectators: bool,

    /// Maximum spectators per lobby (0 = unlimited)
    #[arg(long, env = "ULTIMATE_MAX_SPECTATORS", default_value_t = 0)]
    max_spectators: usize,

    /// Delete a lobby when its last player leaves
    #[arg(long, env = "ULTIMATE_REAP_EMPTY_LOBBIES")]
    reap_empty_lobbies: bool,

    /// Answer malformed move payloads with an error instead of ignoring them
    #[arg(long, env = "ULTIMATE_REPLY_TO_MALFORMED")]
    reply_to_malformed: bool,
}

impl Cli {
    fn server_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            lobby: LobbyConfig {
                allow_spectators: self.allow_spectators,
                max_spectators: self.max_spectators,
                reap_empty_lobbies: self.reap_empty_lobbies,
                ..LobbyConfig::default()
            },
            reply_to_malformed: self.reply_to_malformed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().server_config();
    tracing::info!(?config, "starting");

    let server = UltimateServer::builder().config(config).build().await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = Cli::parse_from(["ultimate-server"]).server_config();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.lobby, LobbyConfig::default());
        assert!(!config.reply_to_malformed);
    }

    #[test]
    fn test_cli_flags() {
        let config = Cli::parse_from([
            "ultimate-server",
            "--bind",
            "127.0.0.1:9000",
            "--allow-spectators",
            "--max-spectators",
            "4",
            "--reap-empty-lobbies",
            "--reply-to-malformed",
        ])
        .server_config();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert!(config.lobby.allow_spectators);
        assert_eq!(config.lobby.max_spectators, 4);
        assert!(config.lobby.reap_empty_lobbies);
        assert!(config.reply_to_malformed);
    }
}
