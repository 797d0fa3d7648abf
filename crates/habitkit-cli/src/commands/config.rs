//! Configuration commands.

use clap::Subcommand;

use habitkit_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a single configuration value
    Get {
        /// Dotted key, e.g. tracker.default_period
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Dotted key, e.g. ui.date_format
        key: String,
        value: String,
    },
    /// Print the whole configuration
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown config key '{key}'"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            println!("Set {key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
