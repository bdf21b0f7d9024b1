use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod listen;
pub mod simulate;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept cuff connections and print decoded readings.
    Listen(ListenArgs),
    /// Act as a blood pressure cuff against a listening manager.
    Simulate(SimulateArgs),
    /// Classify a captured frame and extract its measurement.
    Decode(DecodeArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Decode(args) => decode::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Delay between the association grant and the configuration query, in
    /// milliseconds.
    #[arg(long, value_name = "MS", default_value = "100")]
    pub settle_ms: u64,
    /// Exit after serving N devices.
    #[arg(long, value_name = "N")]
    pub max_sessions: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Systolic pressure to report, in mmHg.
    #[arg(long, default_value = "120")]
    pub systolic: u16,
    /// Diastolic pressure to report, in mmHg.
    #[arg(long, default_value = "80")]
    pub diastolic: u16,
    /// Number of measurement reports to send.
    #[arg(long, default_value = "1")]
    pub readings: usize,
    /// Per-read timeout while waiting for manager responses (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as a hex string.
    #[arg(conflicts_with = "file")]
    pub frame: Option<String>,
    /// Read frame bytes from a file instead.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}
