//! Locating and loading `dirpane.toml`.

use std::io;
use std::path::PathBuf;

use log::{error, info};

use dirpane_core::config::Settings;
use dirpane_core::error::PanelError;

use crate::cli::Options;

/// Load the settings for this run.
///
/// Missing or broken configuration never aborts startup; the defaults are
/// used instead.
pub fn load(options: &Options) -> Settings {
    let path = match options.config_file.clone().or_else(installed_config) {
        Some(path) => path,
        None => {
            info!("No config file found; using default");
            return Settings::default();
        },
    };

    match Settings::load(&path) {
        Ok(settings) => {
            info!("Configuration loaded from {}", path.display());
            settings
        },
        Err(PanelError::IoError(err)) if err.kind() == io::ErrorKind::NotFound => {
            info!("Config file {} does not exist; using default", path.display());
            Settings::default()
        },
        Err(err) => {
            error!("Unable to load config {}: {err}", path.display());
            Settings::default()
        },
    }
}

/// Get the location of the first found default config file.
#[cfg(not(windows))]
fn installed_config() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dirpane");
    xdg_dirs.find_config_file("dirpane.toml").or_else(|| {
        let fallback = home::home_dir()?.join(".config").join("dirpane").join("dirpane.toml");
        fallback.exists().then_some(fallback)
    })
}

#[cfg(windows)]
fn installed_config() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("dirpane").join("dirpane.toml");
    path.exists().then_some(path)
}
