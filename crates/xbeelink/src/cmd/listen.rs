use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use xbeelink_engine::Engine;
use xbeelink_frame::FrameKind;

use crate::cmd::ListenArgs;
use crate::exit::{engine_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let mut engine =
        Engine::open(&args.port, args.baud).map_err(|err| engine_error("open failed", err))?;
    let printed = Arc::new(AtomicUsize::new(0));

    // Handlers run on the engine worker; printing is quick enough to stay
    // inline.
    for kind in FrameKind::ALL {
        let printed = Arc::clone(&printed);
        engine.add_handler(kind, move |frame| {
            print_frame(&frame, format);
            printed.fetch_add(1, Ordering::SeqCst);
        });
    }
    engine.set_error_handler(|err| warn!(%err, "frame rejected"));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    engine.begin();
    while running.load(Ordering::SeqCst) && engine.is_running() {
        if let Some(count) = args.count {
            if printed.load(Ordering::SeqCst) >= count {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    engine.end();

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
