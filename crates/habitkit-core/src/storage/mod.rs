mod config;
pub mod habit_db;
pub mod migrations;

pub use config::{Config, TrackerConfig, UiConfig};
pub use habit_db::HabitDb;

use std::path::PathBuf;

/// Returns `~/.config/habitkit[-dev]/` based on HABITKIT_ENV.
///
/// Set HABITKIT_ENV=dev to use the development data directory.
/// HABITKIT_DATA_DIR overrides the location entirely; tests point it at a
/// temporary directory.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = if let Ok(dir) = std::env::var("HABITKIT_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("HABITKIT_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("habitkit-dev")
        } else {
            base_dir.join("habitkit")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
