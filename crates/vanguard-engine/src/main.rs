//! # Vanguard Engine
//!
//! Headless engine shell for Vanguard, a top-down action game.
//!
//! This crate ties the simulation core to a runnable loop:
//! - Frame timing (wall-clock deltas in milliseconds)
//! - The scrolling camera viewport
//! - TOML configuration
//! - A demo scene and headless session runner
//!
//! Rendering, audio, and device input are deliberately absent; a
//! presentation front end would read actor state and drain the world's
//! event bus each frame.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod easing;
mod timing;
mod viewport;

use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("vanguard=info".parse()?))
        .init();

    info!("Vanguard starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::EngineConfig::load(Path::new(config::CONFIG_FILE));
    let mut app = app::App::new(config);
    app.run();

    info!("Vanguard shutdown complete");
    Ok(())
}
