use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hdplink_session::{EventSink, Manager, SessionConfig};

use crate::cmd::ListenArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{OutputFormat, PrintSink};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let sink: Arc<dyn EventSink> = Arc::new(PrintSink::new(format));
    let config = SessionConfig::default()
        .with_association_settle(Duration::from_millis(args.settle_ms));

    let manager = Manager::register(&args.path, sink, config)
        .map_err(|err| session_error("bind failed", err))?;
    tracing::info!(path = %manager.path().display(), "waiting for devices");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut served = 0usize;

    while running.load(Ordering::SeqCst) {
        let session = match manager.accept() {
            Ok(session) => session,
            Err(err) => return Err(session_error("accept failed", err)),
        };

        // One device at a time; the exchange is short-lived.
        session.join();
        served = served.saturating_add(1);

        if let Some(max) = args.max_sessions {
            if served >= max {
                break;
            }
        }
    }

    manager.unregister();
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
