use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use xbeelink_frame::{
    delivery_status_description, discovery_status_description, modem_status_description,
    receive_options_description, ApiFrame,
};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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
struct FrameOutput {
    kind: &'static str,
    detail: String,
    payload_size: usize,
    payload: String,
}

pub fn print_frame(frame: &ApiFrame, format: OutputFormat) {
    let (detail, payload) = describe(frame);
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                kind: frame.kind().name(),
                detail,
                payload_size: payload.len(),
                payload: payload_preview(&payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "DETAIL", "PAYLOAD"])
                .add_row(vec![
                    frame.kind().name().to_string(),
                    detail,
                    payload_preview(&payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} payload={}",
                frame.kind().name(),
                detail,
                payload_preview(&payload)
            );
        }
        OutputFormat::Raw => {
            print_raw(&payload);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// One-line field summary and the frame's variable payload.
fn describe(frame: &ApiFrame) -> (String, Vec<u8>) {
    match frame {
        ApiFrame::AtCommand(command) => (
            format!(
                "id={} command={}",
                command.frame_id,
                String::from_utf8_lossy(&command.command)
            ),
            command.parameter.to_vec(),
        ),
        ApiFrame::Transmit(transmit) => (
            format!(
                "id={} dest={} network={} options=0x{:02X}",
                transmit.frame_id, transmit.destination, transmit.network, transmit.options
            ),
            transmit.payload.to_vec(),
        ),
        ApiFrame::AtResponse(response) => (
            format!(
                "id={} command={} status={}",
                response.frame_id,
                String::from_utf8_lossy(&response.command),
                response.status
            ),
            response.value.to_vec(),
        ),
        ApiFrame::ModemStatus(status) => (
            format!(
                "status=0x{:02X} ({})",
                status.status,
                modem_status_description(status.status)
            ),
            Vec::new(),
        ),
        ApiFrame::TxStatus(status) => (
            format!(
                "id={} network={} retries={} delivery={} discovery={}",
                status.frame_id,
                status.network,
                status.retry_count,
                delivery_status_description(status.delivery_status),
                discovery_status_description(status.discovery_status)
            ),
            Vec::new(),
        ),
        ApiFrame::Receive(receive) => (
            format!(
                "source={} network={} options={}",
                receive.source,
                receive.network,
                receive_options_description(receive.options)
            ),
            receive.payload.to_vec(),
        ),
        ApiFrame::ExplicitReceive(receive) => (
            format!(
                "source={} network={} endpoints=0x{:02X}->0x{:02X} cluster=0x{:04X} profile=0x{:04X}",
                receive.source,
                receive.network,
                receive.source_endpoint,
                receive.destination_endpoint,
                receive.cluster_id,
                receive.profile_id
            ),
            receive.payload.to_vec(),
        ),
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.is_empty() && text.chars().all(|c| !c.is_control()) => text.to_string(),
        _ => hex_string(payload),
    }
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
