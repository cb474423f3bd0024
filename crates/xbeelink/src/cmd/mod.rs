use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod at;
pub mod decode;
pub mod listen;
pub mod ports;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Monitor a serial link and print received frames.
    Listen(ListenArgs),
    /// Send one transmit request frame.
    Send(SendArgs),
    /// Send a local AT command and print the response.
    At(AtArgs),
    /// Decode hex frame bytes offline.
    Decode(DecodeArgs),
    /// List serial devices visible to the process.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::At(args) => at::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Line speed in baud.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path.
    pub port: String,
    /// Line speed in baud.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// 64-bit destination address (16 hex digits).
    #[arg(long)]
    pub dest: String,
    /// 16-bit network address (4 hex digits). Defaults to unknown (FFFE).
    #[arg(long)]
    pub network: Option<String>,
    /// Transmit options byte.
    #[arg(long, default_value_t = 0)]
    pub options: u8,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AtArgs {
    /// Serial device path.
    pub port: String,
    /// Two-letter AT command name (e.g. NJ, ID).
    pub command: String,
    /// Line speed in baud.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Parameter bytes as hex digits.
    #[arg(long)]
    pub param: Option<String>,
    /// Maximum time to wait for the response (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex digits (whitespace allowed).
    pub hex: String,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
