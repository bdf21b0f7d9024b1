use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use hdplink_frame::{FrameKind, Measurement};
use hdplink_session::{EventSink, Status};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MeasurementOutput<'a> {
    kind: &'a str,
    systolic: u16,
    diastolic: u16,
    invoke: String,
    frame: &'a str,
    timestamp: String,
}

pub fn print_measurement(measurement: &Measurement, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MeasurementOutput {
                kind: "measurement",
                systolic: measurement.systolic,
                diastolic: measurement.diastolic,
                invoke: hex::encode(measurement.invoke),
                frame: &measurement.frame_hex,
                timestamp: now_unix_seconds(),
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SYSTOLIC", "DIASTOLIC", "INVOKE"])
                .add_row(vec![
                    measurement.systolic.to_string(),
                    measurement.diastolic.to_string(),
                    hex::encode(measurement.invoke),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "measurement systolic={} diastolic={} invoke={}",
                measurement.systolic,
                measurement.diastolic,
                hex::encode(measurement.invoke)
            );
        }
    }
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    kind: &'a str,
    code: u16,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<i32>,
}

pub fn print_status(status: Status, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = StatusOutput {
                kind: "status",
                code: status.code(),
                name: status.name(),
                outcome: status.outcome().map(|o| o.code()),
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            match status.outcome() {
                Some(outcome) => println!(
                    "status code={} name={} outcome={}",
                    status.code(),
                    status.name(),
                    outcome.code()
                ),
                None => println!("status code={} name={}", status.code(), status.name()),
            }
        }
    }
}

/// Event sink that renders everything to stdout.
pub struct PrintSink {
    format: OutputFormat,
}

impl PrintSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl EventSink for PrintSink {
    fn on_measurement(&self, measurement: &Measurement) {
        print_measurement(measurement, self.format);
    }

    fn on_status(&self, status: Status) {
        print_status(status, self.format);
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    kind: &'a str,
    frame_kind: &'a str,
    opcode: String,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    systolic: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diastolic: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invoke: Option<String>,
}

pub fn print_decoded(
    frame: &[u8],
    frame_kind: FrameKind,
    measurement: Option<&Measurement>,
    format: OutputFormat,
) {
    let opcode = match frame.first() {
        Some(byte) => format!("0x{byte:02x}"),
        None => "none".to_string(),
    };
    match format {
        OutputFormat::Json => {
            let out = DecodeOutput {
                kind: "frame",
                frame_kind: frame_kind.name(),
                opcode,
                length: frame.len(),
                systolic: measurement.map(|m| m.systolic),
                diastolic: measurement.map(|m| m.diastolic),
                invoke: measurement.map(|m| hex::encode(m.invoke)),
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["frame_kind".to_string(), frame_kind.name().to_string()])
                .add_row(vec!["opcode".to_string(), opcode])
                .add_row(vec!["length".to_string(), frame.len().to_string()]);
            if let Some(m) = measurement {
                table
                    .add_row(vec!["systolic".to_string(), m.systolic.to_string()])
                    .add_row(vec!["diastolic".to_string(), m.diastolic.to_string()])
                    .add_row(vec!["invoke".to_string(), hex::encode(m.invoke)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match measurement {
            Some(m) => println!(
                "frame kind={} opcode={} length={} systolic={} diastolic={} invoke={}",
                frame_kind.name(),
                opcode,
                frame.len(),
                m.systolic,
                m.diastolic,
                hex::encode(m.invoke)
            ),
            None => println!(
                "frame kind={} opcode={} length={}",
                frame_kind.name(),
                opcode,
                frame.len()
            ),
        },
    }
}

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    kind: &'a str,
    readings: usize,
    systolic: u16,
    diastolic: u16,
}

pub fn print_exchange_summary(
    readings: usize,
    systolic: u16,
    diastolic: u16,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = ExchangeOutput {
                kind: "exchange",
                readings,
                systolic,
                diastolic,
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["READINGS", "SYSTOLIC", "DIASTOLIC"])
                .add_row(vec![
                    readings.to_string(),
                    systolic.to_string(),
                    diastolic.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("exchange readings={readings} systolic={systolic} diastolic={diastolic}");
        }
    }
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
