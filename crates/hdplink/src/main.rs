mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "hdplink", version, about = "HDP blood pressure manager CLI")]
struct Cli {
    /// Format for readings and status events on stdout.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let code = cmd::run(cli.command, format).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        err.code
    });
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "hdplink",
            "listen",
            "/tmp/hdp.sock",
            "--settle-ms",
            "0",
            "--max-sessions",
            "1",
        ])
        .expect("listen args should parse");

        assert!(matches!(cli.command, Command::Listen(_)));
    }

    #[test]
    fn simulate_defaults_to_one_normal_reading() {
        let cli = Cli::try_parse_from(["hdplink", "simulate", "/tmp/hdp.sock"])
            .expect("simulate args should parse");

        let args = match cli.command {
            Command::Simulate(args) => args,
            other => panic!("expected simulate, got {other:?}"),
        };
        assert_eq!(args.systolic, 120);
        assert_eq!(args.diastolic, 80);
        assert_eq!(args.readings, 1);
    }

    #[test]
    fn rejects_decode_with_both_frame_and_file() {
        let err = Cli::try_parse_from(["hdplink", "decode", "e2", "--file", "/tmp/frame.bin"])
            .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
