//! Unified error type for the server.

use ultimate_protocol::ProtocolError;
use ultimate_transport::TransportError;

/// Top-level error for failures that end a connection.
///
/// Lobby and move errors never appear here: they are answered on the wire.
/// `#[from]` on each variant lets `?` lift sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum UltimateError {
    /// Bind, accept, send or receive failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let err: UltimateError = err.into();
        assert!(matches!(err, UltimateError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let bad = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: UltimateError = ProtocolError::Decode(bad).into();
        assert!(matches!(err, UltimateError::Protocol(_)));
        assert!(err.to_string().starts_with("decode failed"));
    }
}
