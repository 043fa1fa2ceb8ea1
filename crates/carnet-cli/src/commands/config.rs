//! Configuration subcommands.

use anyhow::Result;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn run(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load();
            print!("{}", toml::to_string_pretty(&config)?);
        }

        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {key} = {value}");
        }

        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }

        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                println!("Configuration already exists at {}", path.display());
            } else {
                Config::default().save()?;
                println!("Created {}", path.display());
            }
        }
    }
    Ok(())
}
