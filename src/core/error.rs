//! Error types for the SGS client.

use std::fmt::Display;
use thiserror::Error;

/// Errors surfaced by this crate.
///
/// There is no local recovery or retry anywhere: a connection failure is
/// fatal to the client instance being constructed, and a remote-call failure
/// is reported to the caller of that operation with any previously cached
/// state left untouched.
#[derive(Error, Debug)]
pub enum SgsError {
    /// The service description could not be fetched or parsed at
    /// construction time. The client instance is unusable; reconstruct.
    #[error("Failed to connect to SGS service at {url}: {message}")]
    Connection {
        /// URL of the service description that was requested.
        url: String,
        message: String,
    },

    /// A remote operation failed: network error, HTTP error status, SOAP
    /// fault, malformed payload, or an empty result for the requested code.
    #[error("SGS operation {operation} failed: {message}")]
    RemoteService {
        /// Name of the webservice operation that was invoked.
        operation: String,
        message: String,
    },
}

impl SgsError {
    pub(crate) fn connection(url: impl Into<String>, message: impl Display) -> Self {
        SgsError::Connection {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn remote(operation: impl Into<String>, message: impl Display) -> Self {
        SgsError::RemoteService {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SgsError>;
