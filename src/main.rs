use color_eyre::{eyre::eyre, Result};
use gamepads::config::AppConfig;
use gamepads::host::{
    DeviceEnumerator, GilrsEnumerator, LoggingNotifier, PlatformIdentity, TickDriver,
};
use gamepads::{Gamepads, GamepadsError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

// gilrs handles are not Send, everything stays on one thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    let config = AppConfig::load_default().map_err(GamepadsError::from)?;
    let normalizer = config
        .normalizer(PlatformIdentity::native())
        .map_err(GamepadsError::from)?;

    let enumerator = GilrsEnumerator::new()
        .map_err(GamepadsError::from)
        .map_err(|e| eyre!("Failed to open gamepad backend: {}", e))?;
    let gamepads = Gamepads::with_normalizer(
        Box::new(enumerator) as Box<dyn DeviceEnumerator>,
        normalizer,
    );

    let shutdown = CancellationToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => error!("Unable to listen for Ctrl+C: {}", e),
        }
        ctrl_c_token.cancel();
    });

    let driver = TickDriver::create(
        gamepads,
        Box::new(LoggingNotifier),
        config.driver.clone(),
        shutdown,
    );

    match driver.wait_for_device().await {
        Some(running) => {
            let ticks = running.run_until_shutdown().await;
            info!("Finished after {} ticks", ticks);
        }
        None => info!("No gamepad connected before shutdown"),
    }

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
