use std::io::{ErrorKind, Write};
use std::sync::mpsc::Receiver;

use hdplink_frame::Response;
use tracing::{debug, warn};

/// Writer task for one channel.
///
/// Every response for the channel funnels through one queue into this
/// single loop, which owns the write half; template writes therefore hit
/// the wire serialized in dispatch order. Runs until the queue's senders
/// are gone. A failed write drops that response and keeps the loop alive.
pub(crate) fn run_writer<W: Write>(mut stream: W, responses: Receiver<Response>, channel_id: u32) {
    while let Ok(response) = responses.recv() {
        debug!(
            channel = channel_id,
            response = response.name(),
            selector = response.selector(),
            "sending canned response"
        );
        if let Err(err) = send_template(&mut stream, response.bytes()) {
            warn!(
                channel = channel_id,
                response = response.name(),
                error = %err,
                "response write failed; dropping"
            );
        }
    }
    debug!(channel = channel_id, "response queue closed");
}

fn send_template(stream: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match stream.write(&bytes[offset..]) {
            Ok(0) => return Err(std::io::Error::from(ErrorKind::WriteZero)),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    stream.flush()
}
