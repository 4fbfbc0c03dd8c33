//! Backdrop Viewer
//!
//! Opens a window running the background for the remembered theme.
//!
//! Usage: `backdrop_viewer [settings.json]`
//!
//! Controls:
//! - T: Toggle dark / light theme (remembered in `backdrop-theme.json`)

use backdrop::app::BackdropApp;
use backdrop::settings::BackdropSettings;
use backdrop::theme::{FileThemeStore, Theme};

const THEME_FILE: &str = "backdrop-theme.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => BackdropSettings::load_or_default(path),
        None => BackdropSettings::default(),
    };

    log::info!("Press T to toggle the theme");
    BackdropApp::new(settings, FileThemeStore::new(THEME_FILE), Theme::Dark)
        .with_title("Backdrop Viewer")
        .run()?;
    Ok(())
}
