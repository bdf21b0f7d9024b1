use std::fs;

use hdplink_frame::{classify, FrameKind, Measurement};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = resolve_frame_bytes(&args)?;
    let kind = classify(&bytes);

    let measurement = match kind {
        FrameKind::DataTransfer => {
            Measurement::extract(&bytes).map_err(|err| frame_error("decode failed", err))?
        }
        _ => None,
    };

    print_decoded(&bytes, kind, measurement.as_ref(), format);
    Ok(SUCCESS)
}

fn resolve_frame_bytes(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(frame) = &args.frame {
        let compact: String = frame.chars().filter(|c| !c.is_whitespace()).collect();
        return hex::decode(&compact)
            .map_err(|err| CliError::new(USAGE, format!("frame is not valid hex: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "provide a hex frame or --file"))
}
