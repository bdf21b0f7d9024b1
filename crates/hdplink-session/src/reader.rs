use std::io::{ErrorKind, Read};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hdplink_frame::{classify, FrameKind, Measurement, ReadBuffer, Response};
use tracing::{debug, trace, warn};

use crate::events::{EventSink, Status};
use crate::machine::{ExchangeMachine, Reaction};

/// Reader task for one channel.
///
/// Owns the read half, the reusable inbound buffer, and the exchange
/// machine. Classification and extraction always see the full zero-padded
/// buffer, so the buffer is zeroed after every processed frame.
pub(crate) struct ReaderTask<R> {
    stream: R,
    buffer: ReadBuffer,
    machine: ExchangeMachine,
    responses: Sender<Response>,
    sink: Arc<dyn EventSink>,
    channel_id: u32,
    settle: Duration,
}

impl<R: Read> ReaderTask<R> {
    pub(crate) fn new(
        stream: R,
        responses: Sender<Response>,
        sink: Arc<dyn EventSink>,
        channel_id: u32,
        settle: Duration,
    ) -> Self {
        Self {
            stream,
            buffer: ReadBuffer::new(),
            machine: ExchangeMachine::new(),
            responses,
            sink,
            channel_id,
            settle,
        }
    }

    /// Run the read loop until EOF or a read error, then tear down.
    pub(crate) fn run(mut self) {
        loop {
            let read = match self.stream.read(self.buffer.as_mut_slice()) {
                Ok(0) => {
                    debug!(channel = self.channel_id, "channel reached end of stream");
                    break;
                }
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(channel = self.channel_id, error = %err, "channel read failed");
                    break;
                }
            };

            self.sink.on_status(Status::DataReceived);
            self.process(read);
        }

        // Drop the queue sender first so the writer task drains and exits,
        // then release the read half before announcing completion.
        let ReaderTask {
            responses,
            stream,
            sink,
            channel_id,
            ..
        } = self;
        drop(responses);
        drop(stream);
        debug!(channel = channel_id, "read loop finished");
        sink.on_status(Status::ReadDone);
    }

    fn process(&mut self, read: usize) {
        let kind = classify(self.buffer.frame());
        trace!(
            channel = self.channel_id,
            kind = kind.name(),
            read,
            frame = %hex::encode(&self.buffer.frame()[..read]),
            "inbound frame"
        );

        let reaction = match kind {
            FrameKind::Empty => return,
            FrameKind::Unknown => {
                debug!(
                    channel = self.channel_id,
                    opcode = self.buffer.frame()[0],
                    "ignoring unclassified opcode"
                );
                return;
            }
            FrameKind::DataTransfer => {
                match Measurement::extract(self.buffer.frame()) {
                    Ok(Some(measurement)) => {
                        debug!(
                            channel = self.channel_id,
                            systolic = measurement.systolic,
                            diastolic = measurement.diastolic,
                            "measurement decoded"
                        );
                        self.sink.on_measurement(&measurement);
                    }
                    Ok(None) => {
                        debug!(channel = self.channel_id, "configuration report received");
                    }
                    Err(err) => {
                        warn!(
                            channel = self.channel_id,
                            error = %err,
                            "dropping malformed data frame"
                        );
                        self.buffer.reset();
                        return;
                    }
                }
                self.machine.on_frame(kind, self.buffer.frame())
            }
            FrameKind::AssociationRequest | FrameKind::ReleaseRequest => {
                self.machine.on_frame(kind, self.buffer.frame())
            }
        };

        self.apply(reaction);
        self.buffer.reset();
    }

    fn apply(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::None => {}
            Reaction::Send(response) => self.dispatch(response),
            Reaction::SendThenSettle(grant) => {
                self.dispatch(grant);
                // The cuff needs the grant on the wire and a moment to
                // settle before it will answer the follow-up query.
                thread::sleep(self.settle);
                let followup = self.machine.association_settled();
                self.dispatch(followup);
            }
        }
    }

    fn dispatch(&self, response: Response) {
        if self.responses.send(response).is_err() {
            warn!(
                channel = self.channel_id,
                response = response.name(),
                "writer task gone; dropping response"
            );
        }
    }
}
