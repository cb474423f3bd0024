use xbeelink_frame::sync::decode_raw;
use xbeelink_frame::{FRAME_DELIMITER, FRAME_OVERHEAD};

use crate::cmd::DecodeArgs;
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;

    // Unlike the live synchronizer, the input here is complete: there is
    // nothing to wait for, so a trailing short frame decodes directly and
    // anything left over is reported.
    let mut offset = 0usize;
    let mut decoded = 0usize;
    let mut rejected = 0usize;
    let mut discarded = 0usize;

    while offset < bytes.len() {
        if bytes[offset] != FRAME_DELIMITER {
            offset += 1;
            discarded += 1;
            continue;
        }
        if bytes.len() - offset < FRAME_OVERHEAD {
            break;
        }
        let declared = u16::from_be_bytes([bytes[offset + 1], bytes[offset + 2]]) as usize;
        let total = declared + FRAME_OVERHEAD;
        if bytes.len() - offset < total {
            break;
        }

        match decode_raw(&bytes[offset..offset + total]) {
            Ok(frame) => {
                print_frame(&frame, format);
                decoded += 1;
            }
            Err(err) => {
                eprintln!("rejected frame at byte {offset}: {err}");
                rejected += 1;
            }
        }
        offset += total;
    }

    if discarded > 0 {
        eprintln!("discarded {discarded} byte(s) outside frame boundaries");
    }
    if offset < bytes.len() {
        eprintln!(
            "{} trailing byte(s) do not form a complete frame",
            bytes.len() - offset
        );
    }

    if rejected > 0 || decoded == 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("{decoded} frame(s) decoded, {rejected} rejected"),
        ));
    }
    Ok(SUCCESS)
}

/// Parse hex digits into bytes, ignoring whitespace.
pub(crate) fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "hex input must have an even number of digits",
        ));
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex: {}", &cleaned[i..i + 2])))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_quiet(hex: &str) -> CliResult<i32> {
        run(
            DecodeArgs {
                hex: hex.to_string(),
            },
            OutputFormat::Json,
        )
    }

    #[test]
    fn parse_hex_accepts_spacing() {
        assert_eq!(
            parse_hex("7E 00 02 8a 06 6F").unwrap(),
            vec![0x7E, 0x00, 0x02, 0x8A, 0x06, 0x6F]
        );
    }

    #[test]
    fn parse_hex_rejects_odd_and_invalid_input() {
        assert_eq!(parse_hex("7E0").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("7G").unwrap_err().code, USAGE);
    }

    #[test]
    fn decodes_a_valid_frame() {
        assert_eq!(run_quiet("7E00058801424400F0").unwrap(), SUCCESS);
    }

    #[test]
    fn decodes_a_short_frame_without_waiting() {
        // A complete 6-byte modem status needs no synchronization margin
        // when the input is known to be complete.
        assert_eq!(run_quiet("7E00028A066F").unwrap(), SUCCESS);
    }

    #[test]
    fn decodes_multiple_frames_with_noise() {
        assert_eq!(run_quiet("FF FF 7E00028A066F 00 7E00058801424400F0").unwrap(), SUCCESS);
    }

    #[test]
    fn corrupt_checksum_is_data_invalid() {
        assert_eq!(run_quiet("7E00058801424400F1").unwrap_err().code, DATA_INVALID);
    }

    #[test]
    fn empty_input_is_data_invalid() {
        assert_eq!(run_quiet("").unwrap_err().code, DATA_INVALID);
    }
}
