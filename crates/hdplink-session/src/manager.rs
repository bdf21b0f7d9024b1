use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use hdplink_channel::ChannelListener;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::events::{EventSink, Outcome, Status};
use crate::session::{ExchangeSession, SessionConfig};

/// Accepts data channels on a listening endpoint and runs one
/// [`ExchangeSession`] per channel.
///
/// Channel ids are assigned in accept order, starting at 1; the id in the
/// supplied [`SessionConfig`] is ignored.
pub struct Manager {
    listener: ChannelListener,
    sink: Arc<dyn EventSink>,
    config: SessionConfig,
    next_channel_id: AtomicU32,
}

impl Manager {
    /// Bind the listening endpoint and report the registration.
    pub fn register(
        path: impl AsRef<Path>,
        sink: Arc<dyn EventSink>,
        config: SessionConfig,
    ) -> Result<Self> {
        let listener = match ChannelListener::bind(path.as_ref()) {
            Ok(listener) => listener,
            Err(err) => {
                warn!(path = %path.as_ref().display(), error = %err, "registration failed");
                sink.on_status(Status::AppRegistered(Outcome::Fail));
                return Err(err.into());
            }
        };
        info!(path = %listener.path().display(), "listener registered");
        sink.on_status(Status::AppRegistered(Outcome::Ok));
        Ok(Self {
            listener,
            sink,
            config,
            next_channel_id: AtomicU32::new(1),
        })
    }

    /// Wait for the next device connection and start its exchange.
    pub fn accept(&self) -> Result<ExchangeSession> {
        let channel = match self.listener.accept() {
            Ok(channel) => channel,
            Err(err) => {
                warn!(error = %err, "accept failed");
                self.sink.on_status(Status::ChannelCreated(Outcome::Fail));
                return Err(err.into());
            }
        };
        let channel_id = self.next_channel_id.fetch_add(1, Ordering::Relaxed);
        debug!(channel = channel_id, "data channel accepted");
        let config = SessionConfig {
            channel_id,
            ..self.config
        };
        ExchangeSession::attach(channel, self.sink.clone(), config)
    }

    /// Path of the listening endpoint.
    pub fn path(&self) -> &Path {
        self.listener.path()
    }

    /// Release the listening endpoint and report the deregistration.
    ///
    /// Sessions already accepted keep running; only the listener goes away.
    pub fn unregister(self) {
        let Manager { listener, sink, .. } = self;
        info!(path = %listener.path().display(), "listener unregistered");
        drop(listener);
        sink.on_status(Status::AppUnregistered(Outcome::Ok));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{Read, Write};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    use hdplink_channel::DataChannel;
    use hdplink_frame::{agent, templates, Measurement};

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hdplink-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[derive(Default)]
    struct StatusSink {
        statuses: Mutex<Vec<Status>>,
    }

    impl StatusSink {
        fn statuses(&self) -> Vec<Status> {
            self.statuses.lock().unwrap().clone()
        }
    }

    impl EventSink for StatusSink {
        fn on_measurement(&self, _measurement: &Measurement) {}

        fn on_status(&self, status: Status) {
            self.statuses.lock().unwrap().push(status);
        }
    }

    fn quick_config() -> SessionConfig {
        SessionConfig::default().with_association_settle(Duration::ZERO)
    }

    #[test]
    fn test_register_reports_app_registered() {
        let path = temp_dir("mgr-register").join("hdp.sock");
        let sink = Arc::new(StatusSink::default());

        let manager = Manager::register(&path, sink.clone(), quick_config()).unwrap();

        assert_eq!(manager.path(), path.as_path());
        assert!(path.exists());
        assert_eq!(
            sink.statuses(),
            vec![Status::AppRegistered(Outcome::Ok)]
        );

        manager.unregister();
    }

    #[test]
    fn test_register_failure_reports_app_registered_fail() {
        let path = temp_dir("mgr-register-fail")
            .join("missing")
            .join("hdp.sock");
        let sink = Arc::new(StatusSink::default());

        let err = Manager::register(&path, sink.clone(), quick_config());

        assert!(err.is_err());
        assert_eq!(
            sink.statuses(),
            vec![Status::AppRegistered(Outcome::Fail)]
        );
    }

    #[test]
    fn test_accept_assigns_incrementing_channel_ids() {
        let path = temp_dir("mgr-accept").join("hdp.sock");
        let sink = Arc::new(StatusSink::default());
        let manager = Manager::register(&path, sink.clone(), quick_config()).unwrap();

        let mut first_device = DataChannel::connect(&path).unwrap();
        let first = manager.accept().unwrap();
        assert_eq!(first.channel_id(), 1);

        first_device.write_all(&agent::ASSOCIATION_REQUEST).unwrap();
        let mut grant = [0u8; 48];
        first_device.read_exact(&mut grant).unwrap();
        assert_eq!(grant, templates::ASSOCIATION_RESPONSE);

        drop(first_device);
        first.join();

        let second_device = DataChannel::connect(&path).unwrap();
        let second = manager.accept().unwrap();
        assert_eq!(second.channel_id(), 2);

        drop(second_device);
        second.join();
        manager.unregister();
    }

    #[test]
    fn test_unregister_removes_socket_and_reports() {
        let path = temp_dir("mgr-unregister").join("hdp.sock");
        let sink = Arc::new(StatusSink::default());
        let manager = Manager::register(&path, sink.clone(), quick_config()).unwrap();

        manager.unregister();

        assert!(!path.exists());
        assert_eq!(
            *sink.statuses().last().unwrap(),
            Status::AppUnregistered(Outcome::Ok)
        );
    }
}
