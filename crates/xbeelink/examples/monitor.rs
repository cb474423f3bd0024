//! Frame monitor — opens a serial device and prints every decoded frame.
//!
//! Run with:
//!   cargo run --example monitor -- /dev/ttyUSB0 9600

use std::time::Duration;

use xbeelink::engine::Engine;
use xbeelink::frame::FrameKind;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let port = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let baud: u32 = args.next().as_deref().unwrap_or("9600").parse()?;

    let mut engine = Engine::open(&port, baud)?;
    for kind in FrameKind::ALL {
        engine.add_handler(kind, |frame| println!("{frame:?}"));
    }
    engine.set_error_handler(|err| eprintln!("rejected: {err}"));

    engine.begin();
    eprintln!("Listening on {port} at {baud} baud; Ctrl-C to stop.");
    while engine.is_running() {
        std::thread::sleep(Duration::from_secs(1));
    }
    engine.end();
    Ok(())
}
