use std::fs;

use xbeelink_frame::{Address16, FrameWriter};

use crate::cmd::decode::parse_hex;
use crate::cmd::SendArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let destination = parse_hex(&args.dest)?;
    if destination.len() != 8 {
        return Err(CliError::new(
            USAGE,
            "--dest must be 16 hex digits (an 8-byte address)",
        ));
    }

    let network = match &args.network {
        Some(hex) => {
            let bytes = parse_hex(hex)?;
            if bytes.len() != 2 {
                return Err(CliError::new(
                    USAGE,
                    "--network must be 4 hex digits (a 2-byte address)",
                ));
            }
            Some(Address16([bytes[0], bytes[1]]))
        }
        None => None,
    };

    let payload = resolve_payload(&args)?;

    let mut writer = FrameWriter::open(&args.port, args.baud)
        .map_err(|err| frame_error("open failed", err))?;
    writer
        .send_transmit(&destination, network, args.options, &payload)
        .map_err(|err| frame_error("send failed", err))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "sent": payload.len(),
                "dest": args.dest,
            })
        ),
        _ => println!("sent {} byte(s) to {}", payload.len(), args.dest),
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> SendArgs {
        SendArgs {
            port: "/dev/null".to_string(),
            baud: 9600,
            dest: "0013A200400A0127".to_string(),
            network: None,
            options: 0,
            data: None,
            file: None,
        }
    }

    #[test]
    fn short_destination_is_a_usage_error() {
        let args = SendArgs {
            dest: "0013".to_string(),
            ..base_args()
        };
        assert_eq!(run(args, OutputFormat::Pretty).unwrap_err().code, USAGE);
    }

    #[test]
    fn bad_network_address_is_a_usage_error() {
        let args = SendArgs {
            network: Some("7D".to_string()),
            ..base_args()
        };
        assert_eq!(run(args, OutputFormat::Pretty).unwrap_err().code, USAGE);
    }

    #[test]
    fn resolve_payload_prefers_inline_data() {
        let args = SendArgs {
            data: Some("hello".to_string()),
            ..base_args()
        };
        assert_eq!(resolve_payload(&args).unwrap(), b"hello");
    }

    #[test]
    fn resolve_payload_defaults_to_empty() {
        assert!(resolve_payload(&base_args()).unwrap().is_empty());
    }
}
