use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::{ChannelError, Result};

/// A connected HDP data channel — implements Read + Write.
///
/// Wraps a Unix domain socket stream. An exchange session holds one clone
/// per task (`try_clone`), so its reader and writer can run on separate
/// threads over the same underlying connection.
pub struct DataChannel {
    inner: UnixStream,
}

impl DataChannel {
    pub(crate) fn from_unix(stream: UnixStream) -> Self {
        Self { inner: stream }
    }

    /// Connect to a listening channel endpoint (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|e| ChannelError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(?path, "connected to data channel");
        Ok(Self::from_unix(stream))
    }

    /// Create a connected pair of channels (in-process loopback).
    pub fn pair() -> Result<(Self, Self)> {
        let (a, b) = UnixStream::pair()?;
        Ok((Self::from_unix(a), Self::from_unix(b)))
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Try to clone this channel (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.inner.try_clone()?;
        Ok(Self::from_unix(cloned))
    }

    /// Shut down both directions of the channel.
    ///
    /// Unblocks a reader parked in `read` on any clone: subsequent reads
    /// return `Ok(0)`.
    pub fn shutdown(&self) -> Result<()> {
        self.inner.shutdown(Shutdown::Both).map_err(Into::into)
    }
}

impl Read for DataChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for DataChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for DataChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataChannel")
            .field("transport", &"unix")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_roundtrip() {
        let (mut a, mut b) = DataChannel::pair().unwrap();

        a.write_all(b"cuff").unwrap();
        let mut buf = [0u8; 4];
        b.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"cuff");
    }

    #[test]
    fn test_clone_shares_connection() {
        let (a, mut b) = DataChannel::pair().unwrap();
        let mut a_clone = a.try_clone().unwrap();

        a_clone.write_all(&[0xE2, 0x00]).unwrap();
        let mut buf = [0u8; 2];
        b.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xE2, 0x00]);
    }

    #[test]
    fn test_shutdown_unblocks_reader() {
        let (a, _b) = DataChannel::pair().unwrap();
        let mut reader = a.try_clone().unwrap();

        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 16];
            reader.read(&mut buf)
        });

        // Give the reader time to park in read().
        std::thread::sleep(Duration::from_millis(50));
        a.shutdown().unwrap();

        let n = handle.join().unwrap().unwrap();
        assert_eq!(n, 0, "shutdown should surface as EOF to the reader");
    }

    #[test]
    fn test_read_timeout_applies() {
        let (a, _b) = DataChannel::pair().unwrap();
        a.set_read_timeout(Some(Duration::from_millis(20))).unwrap();

        let mut reader = a.try_clone().unwrap();
        let mut buf = [0u8; 8];
        let err = reader.read(&mut buf).unwrap_err();
        assert!(
            matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            "unexpected error kind: {:?}",
            err.kind()
        );
    }
}
