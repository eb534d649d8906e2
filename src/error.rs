//! Error types for selection register operations.

use thiserror::Error;

/// Result type for selection register operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running or addressing the register daemon.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not establish the X server connection
    #[error("cannot connect to X server: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    /// The established connection failed mid-operation
    #[error("X connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// A request round-trip returned an X error
    #[error("X request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),

    /// Resource id allocation failed
    #[error("X id allocation failed: {0}")]
    Id(#[from] x11rb::errors::ReplyOrIdError),

    /// No daemon owns the marker selection
    #[error("no selreg daemon is running")]
    NoDaemon,

    /// Another process won the daemon election
    #[error("daemon election lost: marker selection settled on another owner")]
    ElectionLost,

    /// Transport backend error outside the x11rb family
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Returns true if this error means setup failed and the process
    /// should exit with a failure status.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ElectionLost)
    }
}
