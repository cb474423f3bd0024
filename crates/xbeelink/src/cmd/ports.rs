use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use xbeelink_transport::available_ports;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = available_ports().map_err(|err| transport_error("enumeration failed", err))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "ports": ports }));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT"]);
            for port in &ports {
                table.add_row(vec![port.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            if ports.is_empty() {
                println!("no serial ports found");
            } else {
                for port in &ports {
                    println!("{port}");
                }
            }
        }
    }

    Ok(SUCCESS)
}
