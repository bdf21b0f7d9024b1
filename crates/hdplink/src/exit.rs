use std::fmt;
use std::io;

use hdplink_channel::ChannelError;
use hdplink_frame::FrameError;
use hdplink_session::SessionError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    // An absent or busy socket path is a transport-reachability failure,
    // not a generic I/O one.
    let unreachable = matches!(
        &err,
        ChannelError::Bind { source, .. } | ChannelError::Connect { source, .. }
            if matches!(
                source.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::NotFound
                    | io::ErrorKind::AddrInUse
            )
    );
    if unreachable {
        return CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"));
    }

    match err {
        ChannelError::Bind { source, .. }
        | ChannelError::Connect { source, .. }
        | ChannelError::Accept(source)
        | ChannelError::Io(source) => io_error(context, source),
        ChannelError::PathTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Channel(err) => channel_error(context, err),
        SessionError::Spawn(source) => {
            CliError::new(INTERNAL, format!("{context}: {source}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_timeout_exit_code() {
        let err = io_error("read", io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(err.code, TIMEOUT);
        let err = io_error("read", io::Error::new(io::ErrorKind::WouldBlock, "slow"));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn unreachable_socket_is_a_transport_error() {
        let err = channel_error(
            "connect",
            ChannelError::Connect {
                path: "/tmp/gone.sock".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);

        let err = channel_error(
            "connect",
            ChannelError::Connect {
                path: "/tmp/gone.sock".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn overlong_path_is_a_usage_error() {
        let err = channel_error(
            "bind",
            ChannelError::PathTooLong {
                path: "/very/long".into(),
                len: 200,
                max: 108,
            },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn frame_errors_mark_data_invalid() {
        let err = frame_error("decode", FrameError::Truncated { need: 4, len: 2 });
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: "));
    }
}
