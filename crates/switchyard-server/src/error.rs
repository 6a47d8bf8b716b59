//! Server error types.

use std::io;
use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("Invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },

    /// The listener could not be bound.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address that was tried.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_display() {
        let source = "nope".parse::<SocketAddr>().unwrap_err();
        let err = ServerError::InvalidAddress {
            addr: "nope".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid address 'nope'"));
    }

    #[test]
    fn test_io_from() {
        let err: ServerError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert_eq!(err.to_string(), "I/O error: boom");
    }
}
