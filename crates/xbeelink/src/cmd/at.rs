use std::io::ErrorKind;
use std::time::{Duration, Instant};

use xbeelink_frame::{ApiFrame, FrameError, FrameReader, FrameWriter};
use xbeelink_transport::SerialLink;

use crate::cmd::decode::parse_hex;
use crate::cmd::AtArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: AtArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let command = args.command.as_bytes();
    if command.len() != 2 {
        return Err(CliError::new(
            USAGE,
            "AT command must be exactly two characters (e.g. NJ)",
        ));
    }
    let parameter = match &args.param {
        Some(hex) => parse_hex(hex)?,
        None => Vec::new(),
    };

    let link = SerialLink::open(&args.port, args.baud)
        .map_err(|err| transport_error("open failed", err))?;
    let reader_link = link
        .try_clone()
        .map_err(|err| transport_error("clone failed", err))?;
    let mut reader = FrameReader::new(reader_link);
    let mut writer = FrameWriter::new(link);

    let frame_id = writer
        .send_at_command(command, &parameter)
        .map_err(|err| frame_error("send failed", err))?;

    // Unrelated traffic (receive frames, modem status) may arrive before
    // the response; only the matching frame id ends the wait.
    let deadline = Instant::now() + timeout;
    loop {
        match reader.read_frame() {
            Ok(ApiFrame::AtResponse(response)) if response.frame_id == frame_id => {
                print_frame(&ApiFrame::AtResponse(response), format);
                return Ok(SUCCESS);
            }
            Ok(_) => {}
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(err) => return Err(frame_error("receive failed", err)),
        }

        if Instant::now() >= deadline {
            return Err(CliError::new(
                TIMEOUT,
                format!("no AT response within {}", args.timeout),
            ));
        }
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
