//! Xbox Wireless Controller monitor
//!
//! Opens the controller, logs every decoded report and announces x/y
//! presses through a [`NoiseObserver`]. Pass a config path as the first
//! argument, otherwise `configs/default.toml` is used when present.
//!
//! Reading from a real device needs the `hid` feature.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use xbox_wireless::config::Config;
use xbox_wireless::SessionManager;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Xbox Wireless Controller Monitor ===");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {}", path))?,
        None => Config::load_default().unwrap_or_else(|e| {
            warn!("Using built-in defaults ({})", e);
            Config::default()
        }),
    };

    let mut manager = SessionManager::new();
    open_controllers(&config, &mut manager)?;

    manager.start()?;
    info!("Waiting for controller events...");

    while manager.is_running() {
        thread::sleep(Duration::from_secs(1));
    }

    for result in manager.join() {
        if let Err(e) = result {
            warn!("Session ended with error: {}", e);
        }
    }

    info!("Manager stopped");
    Ok(())
}

#[cfg(feature = "hid")]
fn open_controllers(config: &Config, manager: &mut SessionManager) -> anyhow::Result<()> {
    use std::sync::Arc;
    use xbox_wireless::dispatch::NoiseObserver;
    use xbox_wireless::transport::HidReadSource;
    use xbox_wireless::ControllerSession;

    let settings = config.session_settings()?;
    let api = hidapi::HidApi::new().context("initializing hidapi")?;
    let source = HidReadSource::open(&api, config.device.vendor_id, config.device.product_id)?;

    let session = ControllerSession::new(source, settings);
    session.attach(Arc::new(NoiseObserver::new("bang", "sproing")));
    manager.add_session(session);

    Ok(())
}

#[cfg(not(feature = "hid"))]
fn open_controllers(config: &Config, _manager: &mut SessionManager) -> anyhow::Result<()> {
    config.validate()?;
    anyhow::bail!("built without the `hid` feature: no device transport available (rebuild with --features hid)")
}
