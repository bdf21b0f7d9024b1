use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ChannelError, Result};
use crate::stream::DataChannel;

/// Listening endpoint for incoming HDP data channels.
///
/// Binds a filesystem-path Unix domain socket. A stale socket file left by
/// a crashed process is removed before binding; anything else already at
/// the path is refused. The socket file is removed again on drop, provided
/// the path still refers to the file this listener created.
pub struct ChannelListener {
    listener: UnixListener,
    path: PathBuf,
    bound_inode: Option<(u64, u64)>,
    cleanup_on_drop: bool,
}

impl ChannelListener {
    /// Default permission mode for created socket paths.
    pub const DEFAULT_SOCKET_MODE: u32 = 0o600;
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 elsewhere.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind and listen at `path` with the default socket mode.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_mode(path, Self::DEFAULT_SOCKET_MODE)
    }

    /// Bind and listen at `path` with an explicit permission mode.
    pub fn bind_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bind_err = |path: &PathBuf, e| ChannelError::Bind {
            path: path.clone(),
            source: e,
        };

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(ChannelError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        Self::clear_stale(&path)?;

        let listener = UnixListener::bind(&path).map_err(|e| bind_err(&path, e))?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| bind_err(&path, e))?;

        let created = std::fs::symlink_metadata(&path).map_err(|e| bind_err(&path, e))?;
        let bound_inode = Some((created.dev(), created.ino()));

        info!(?path, "listening for data channels");

        Ok(Self {
            listener,
            path,
            bound_inode,
            cleanup_on_drop: true,
        })
    }

    /// Remove a leftover socket file at `path`. Never removes non-socket files.
    fn clear_stale(path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let metadata = std::fs::symlink_metadata(path).map_err(|e| ChannelError::Bind {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !metadata.file_type().is_socket() {
            return Err(ChannelError::Bind {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                ),
            });
        }
        debug!(?path, "removing stale channel socket");
        std::fs::remove_file(path).map_err(|e| ChannelError::Bind {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Accept an incoming data channel (blocking).
    pub fn accept(&self) -> Result<DataChannel> {
        let (stream, _addr) = self.listener.accept().map_err(ChannelError::Accept)?;
        debug!("accepted data channel");
        Ok(DataChannel::from_unix(stream))
    }

    /// The path this listener is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ChannelListener {
    fn drop(&mut self) {
        if !self.cleanup_on_drop {
            return;
        }
        let Some((expected_dev, expected_ino)) = self.bound_inode else {
            return;
        };
        if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
            if metadata.file_type().is_socket()
                && metadata.dev() == expected_dev
                && metadata.ino() == expected_ino
            {
                debug!(path = ?self.path, "removing channel socket");
                let _ = std::fs::remove_file(&self.path);
            } else {
                debug!(
                    path = ?self.path,
                    "socket path identity changed; skipping cleanup"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hdplink-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_bind_accept_connect() {
        let dir = temp_dir("bind");
        let sock_path = dir.join("channel.sock");

        let listener = ChannelListener::bind(&sock_path).unwrap();
        assert!(sock_path.exists());

        let path_clone = sock_path.clone();
        let handle = std::thread::spawn(move || {
            let mut device = DataChannel::connect(&path_clone).unwrap();
            device.write_all(&[0xE2, 0x00, 0x00]).unwrap();
        });

        let mut channel = listener.accept().unwrap();
        let mut buf = [0u8; 3];
        channel.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xE2, 0x00, 0x00]);

        handle.join().unwrap();

        drop(listener);
        assert!(
            !sock_path.exists(),
            "dropping the listener should remove its socket file"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_path_too_long() {
        let long_path = "/tmp/".to_string() + &"a".repeat(200) + ".sock";
        let result = ChannelListener::bind(&long_path);
        assert!(matches!(result, Err(ChannelError::PathTooLong { .. })));
    }

    #[test]
    fn test_bind_default_permissions_hardened() {
        let dir = temp_dir("perms");
        let sock_path = dir.join("perm.sock");

        let listener = ChannelListener::bind(&sock_path).unwrap();
        let mode = std::fs::metadata(&sock_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        drop(listener);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bind_rejects_existing_non_socket_file() {
        let dir = temp_dir("bind-file");
        let sock_path = dir.join("not-a-socket.sock");
        std::fs::write(&sock_path, b"regular-file").unwrap();

        let result = ChannelListener::bind(&sock_path);
        assert!(matches!(result, Err(ChannelError::Bind { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bind_replaces_stale_socket() {
        let dir = temp_dir("stale");
        let sock_path = dir.join("stale.sock");

        // Leak the first listener so its Drop never runs and the socket
        // file stays behind, as after a crash.
        let first = ChannelListener::bind(&sock_path).unwrap();
        std::mem::forget(first);
        assert!(sock_path.exists());

        let second = ChannelListener::bind(&sock_path).unwrap();
        assert!(sock_path.exists());

        drop(second);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_drop_does_not_remove_replaced_path() {
        let dir = temp_dir("drop-race");
        let sock_path = dir.join("drop.sock");

        let listener = ChannelListener::bind(&sock_path).unwrap();
        assert!(sock_path.exists());

        // Replace the path while the listener is alive.
        std::fs::remove_file(&sock_path).unwrap();
        std::fs::write(&sock_path, b"replacement-file").unwrap();

        drop(listener);
        assert!(
            sock_path.exists(),
            "drop must leave the path alone once another file owns it"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }
}
