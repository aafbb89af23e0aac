use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

use super::ui::print_json;
use super::ConfigCommand;
use crate::config::{Config, SETTING_KEYS};
use crate::db::Database;

/// Execute a `config` subcommand
pub fn run_config(db: &Database, command: ConfigCommand, json: bool) -> Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            let config = Config::load(db)?;
            let value = config.get(&key).ok_or_else(|| {
                anyhow!(
                    "Unknown setting {:?}. Known settings: {}",
                    key,
                    SETTING_KEYS.join(", ")
                )
            })?;
            if json {
                return print_json(&BTreeMap::from([(key, value)]));
            }
            println!("{}", value);
        }
        ConfigCommand::Set { key, value } => {
            Config::set(db, &key, &value)?;
            if json {
                let stored = Config::load(db)?.get(&key).unwrap_or_default();
                return print_json(&BTreeMap::from([(key, stored)]));
            }
            println!("Saved.");
        }
        ConfigCommand::Unset { key } => {
            Config::unset(db, &key)?;
            if json {
                let value = Config::load(db)?.get(&key).unwrap_or_default();
                return print_json(&BTreeMap::from([(key, value)]));
            }
            println!("Reset.");
        }
        ConfigCommand::List => {
            let entries = Config::load(db)?.entries();
            if json {
                let map: BTreeMap<&str, String> = entries.into_iter().collect();
                return print_json(&map);
            }
            for (key, value) in entries {
                println!("{} = {}", key, value);
            }
        }
    }
    Ok(())
}
