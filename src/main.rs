use anyhow::Result;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxline::history::CallLog;
use voxline::session::{CallConfig, CallController, CallMode};

/// Scripted demo session: start a video call, let it tick, toggle the
/// mic, hang up, and print the resulting call log.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting voxline demo session");

    let config = CallConfig::for_mode(CallMode::Video)
        .with_setup_delay(Duration::from_millis(500))
        .with_tick_interval(Duration::from_millis(1000));
    let log = CallLog::new();
    let controller = CallController::with_log(config, log.clone())?;

    let mut rx = controller.subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            info!(%state, "transition");
        }
    });

    controller.start_call();
    tokio::time::sleep(Duration::from_millis(3600)).await;
    controller.toggle_mic_mute();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    controller.end_call();

    for record in log.get_all() {
        info!(
            mode = %record.mode,
            duration_secs = record.duration_secs,
            "call log entry"
        );
    }

    drop(controller);
    printer.await?;
    Ok(())
}
