use std::io::{Read, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hdplink_channel::DataChannel;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::events::{EventSink, Outcome, Status};
use crate::reader::ReaderTask;
use crate::writer::run_writer;

/// How long the manager lets the cuff settle between the association grant
/// and the configuration query.
pub const ASSOCIATION_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Per-session knobs.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Host-visible channel id carried in lifecycle callbacks.
    pub channel_id: u32,
    /// Gap between the association grant and the configuration query.
    pub association_settle: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            association_settle: ASSOCIATION_SETTLE_DELAY,
        }
    }
}

impl SessionConfig {
    /// Override the host-visible channel id.
    pub fn with_channel_id(mut self, channel_id: u32) -> Self {
        self.channel_id = channel_id;
        self
    }

    /// Override the association settle delay.
    pub fn with_association_settle(mut self, delay: Duration) -> Self {
        self.association_settle = delay;
        self
    }
}

/// A running exchange over one data channel: a reader thread, a writer
/// thread, and the response queue between them.
///
/// The session owns both threads. [`ExchangeSession::join`] waits for the
/// reader to hit end of stream (or [`ExchangeSession::shutdown`] to force
/// it there) and then delivers the teardown events.
pub struct ExchangeSession {
    channel_id: u32,
    channel: Option<DataChannel>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
    sink: Arc<dyn EventSink>,
}

impl ExchangeSession {
    /// Attach the exchange engine to a connected channel.
    pub fn attach(
        channel: DataChannel,
        sink: Arc<dyn EventSink>,
        config: SessionConfig,
    ) -> Result<Self> {
        let read_half = channel.try_clone()?;
        let write_half = channel.try_clone()?;
        Self::spawn(read_half, write_half, Some(channel), sink, config)
    }

    /// Run the exchange engine over arbitrary halves.
    ///
    /// For embedding and tests; [`ExchangeSession::shutdown`] is a no-op
    /// for sessions built this way.
    pub fn from_parts<R, W>(
        read_half: R,
        write_half: W,
        sink: Arc<dyn EventSink>,
        config: SessionConfig,
    ) -> Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::spawn(read_half, write_half, None, sink, config)
    }

    fn spawn<R, W>(
        read_half: R,
        write_half: W,
        channel: Option<DataChannel>,
        sink: Arc<dyn EventSink>,
        config: SessionConfig,
    ) -> Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let channel_id = config.channel_id;
        let (tx, rx) = mpsc::channel();

        let writer = thread::Builder::new()
            .name(format!("hdp-writer-{channel_id}"))
            .spawn(move || run_writer(write_half, rx, channel_id))
            .map_err(SessionError::Spawn)?;

        // The host hears about the channel before any data can reach it.
        sink.on_channel_opened(channel_id);
        sink.on_status(Status::ChannelCreated(Outcome::Ok));

        let task = ReaderTask::new(
            read_half,
            tx,
            sink.clone(),
            channel_id,
            config.association_settle,
        );
        let reader = match thread::Builder::new()
            .name(format!("hdp-reader-{channel_id}"))
            .spawn(move || task.run())
        {
            Ok(handle) => handle,
            Err(err) => {
                // The failed spawn dropped the task and with it the queue
                // sender, so the writer thread is already on its way out.
                sink.on_status(Status::ChannelDestroyed(Outcome::Fail));
                sink.on_channel_closed(channel_id);
                return Err(SessionError::Spawn(err));
            }
        };

        debug!(channel = channel_id, "exchange session started");
        Ok(Self {
            channel_id,
            channel,
            reader,
            writer,
            sink,
        })
    }

    /// Host-visible channel id.
    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    /// Shut down the underlying channel, unblocking the reader.
    pub fn shutdown(&self) -> Result<()> {
        if let Some(channel) = &self.channel {
            channel.shutdown()?;
        }
        Ok(())
    }

    /// Wait for both tasks to finish, then deliver the teardown events.
    pub fn join(self) {
        let reader_ok = self.reader.join().is_ok();
        let writer_ok = self.writer.join().is_ok();
        let outcome = if reader_ok && writer_ok {
            Outcome::Ok
        } else {
            Outcome::Fail
        };
        self.sink.on_status(Status::ChannelDestroyed(outcome));
        self.sink.on_channel_closed(self.channel_id);
        debug!(channel = self.channel_id, "exchange session finished");
    }
}
