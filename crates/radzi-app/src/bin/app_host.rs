//! Minimal host stub intended for downstream bindings (Swift/Kotlin).
//! Guarded by the `host` feature: boots the headless `AppCore` with the
//! production handlers, rehydrates preferences and runs the startup
//! redirect once.
use anyhow::{Context, Result};
use radzi_app::{AppCore, AppEffects, RadziConfig};
use radzi_effects::{init_tracing, ChannelNavigationHandler};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RADZI_CONFIG").ok())
        .map(PathBuf::from);
    let config = RadziConfig::load(path.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging.level);

    let (navigator, mut routes) = ChannelNavigationHandler::channel();
    let effects = AppEffects::production(&config, Arc::new(navigator))?;
    let app = AppCore::new(config, effects, false)?;

    app.initialize_preferences().await;
    println!(
        "Preferences: layer={} mode={:?}",
        app.map_layer().map_layer(),
        app.map_mode().state()
    );

    app.bootstrap().run().await;
    match routes.try_recv() {
        Ok(route) => println!("App host ready, landing on {route}"),
        Err(_) => println!("App host ready, no redirect issued"),
    }
    Ok(())
}
