use std::path::PathBuf;

/// Errors from data-channel setup and stream operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to bind the listening endpoint.
    #[error("failed to bind channel endpoint {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to a listening endpoint.
    #[error("failed to connect to channel endpoint {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming channel.
    #[error("failed to accept channel: {0}")]
    Accept(std::io::Error),

    /// An I/O error occurred on the channel stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
