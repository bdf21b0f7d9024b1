//! Minimal embedding host — runs one exchange over a socket pair against an
//! in-process cuff and prints what the engine reports.
//!
//! Run with:
//!   cargo run --example host-sink

use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hdplink::channel::DataChannel;
use hdplink::frame::{agent, Measurement};
use hdplink::session::{EventSink, ExchangeSession, SessionConfig, Status};

struct StderrSink;

impl EventSink for StderrSink {
    fn on_channel_opened(&self, channel_id: u32) {
        eprintln!("channel {channel_id} opened");
    }

    fn on_channel_closed(&self, channel_id: u32) {
        eprintln!("channel {channel_id} closed");
    }

    fn on_measurement(&self, measurement: &Measurement) {
        println!(
            "reading: {}/{} mmHg",
            measurement.systolic, measurement.diastolic
        );
    }

    fn on_status(&self, status: Status) {
        eprintln!("status {} ({})", status.code(), status.name());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (manager_side, device_side) = DataChannel::pair()?;

    let cuff = thread::spawn(move || run_cuff(device_side));

    let config = SessionConfig::default()
        .with_channel_id(1)
        .with_association_settle(Duration::from_millis(10));
    let session = ExchangeSession::attach(manager_side, Arc::new(StderrSink), config)?;

    cuff.join().expect("cuff thread should finish")?;
    session.join();
    Ok(())
}

fn run_cuff(mut channel: DataChannel) -> std::io::Result<()> {
    channel.write_all(&agent::ASSOCIATION_REQUEST)?;
    let mut grant = [0u8; 48];
    channel.read_exact(&mut grant)?;

    let mut query = [0u8; 18];
    channel.read_exact(&mut query)?;
    channel.write_all(&agent::configuration_report())?;
    // Let both configuration reads drain before more traffic lands.
    thread::sleep(Duration::from_millis(150));

    channel.write_all(&agent::measurement_report(118, 76, [0x00, 0x01]))?;
    let mut ack = [0u8; 22];
    channel.read_exact(&mut ack)?;

    channel.write_all(&agent::RELEASE_REQUEST)?;
    let mut release = [0u8; 6];
    channel.read_exact(&mut release)?;
    Ok(())
}
