use hdplink_channel::ChannelError;

/// Errors from session setup and the channel manager.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Channel plumbing failed (bind, accept, clone, shutdown).
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// A session task could not be spawned.
    #[error("failed to spawn session task: {0}")]
    Spawn(std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
