use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

use hdplink_channel::DataChannel;
use hdplink_frame::{agent, opcode};

use crate::cmd::SimulateArgs;
use crate::exit::{channel_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_exchange_summary, OutputFormat};

// The configuration report spans two manager reads and gets no reply; it has
// to drain before more traffic, since stream reads do not preserve frame
// boundaries.
const CONFIGURATION_DRAIN_DELAY: Duration = Duration::from_millis(150);

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let mut channel = DataChannel::connect(&args.path)
        .map_err(|err| channel_error("connect failed", err))?;
    channel
        .set_read_timeout(Some(timeout))
        .map_err(|err| channel_error("set read timeout failed", err))?;
    channel
        .set_write_timeout(Some(timeout))
        .map_err(|err| channel_error("set write timeout failed", err))?;

    channel
        .write_all(&agent::ASSOCIATION_REQUEST)
        .map_err(|err| io_error("send association request", err))?;
    let grant: [u8; 48] = read_response(&mut channel, "association response")?;
    expect_opcode(&grant, opcode::ASSOCIATION_RESPONSE, "association response")?;

    let query: [u8; 18] = read_response(&mut channel, "configuration query")?;
    expect_opcode(&query, opcode::DATA, "configuration query")?;
    channel
        .write_all(&agent::configuration_report())
        .map_err(|err| io_error("send configuration report", err))?;
    thread::sleep(CONFIGURATION_DRAIN_DELAY);

    for reading in 0..args.readings {
        let invoke = (reading as u16).wrapping_add(1).to_be_bytes();
        let report = agent::measurement_report(args.systolic, args.diastolic, invoke);
        channel
            .write_all(&report)
            .map_err(|err| io_error("send measurement report", err))?;
        let ack: [u8; 22] = read_response(&mut channel, "measurement acknowledgement")?;
        expect_opcode(&ack, opcode::DATA, "measurement acknowledgement")?;
    }

    channel
        .write_all(&agent::RELEASE_REQUEST)
        .map_err(|err| io_error("send release request", err))?;
    let release: [u8; 6] = read_response(&mut channel, "release response")?;
    expect_opcode(&release, opcode::RELEASE_RESPONSE, "release response")?;

    print_exchange_summary(args.readings, args.systolic, args.diastolic, format);
    Ok(SUCCESS)
}

fn read_response<const N: usize>(channel: &mut DataChannel, what: &str) -> CliResult<[u8; N]> {
    let mut buf = [0u8; N];
    channel
        .read_exact(&mut buf)
        .map_err(|err| io_error(&format!("read {what}"), err))?;
    Ok(buf)
}

fn expect_opcode(frame: &[u8], expected: u8, what: &str) -> CliResult<()> {
    match frame.first() {
        Some(&byte) if byte == expected => Ok(()),
        Some(&byte) => Err(CliError::new(
            DATA_INVALID,
            format!("{what}: unexpected opcode 0x{byte:02x}, wanted 0x{expected:02x}"),
        )),
        None => Err(CliError::new(DATA_INVALID, format!("{what}: empty frame"))),
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
