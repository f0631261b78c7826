use crate::application_impl::DEFAULT_BASE_URL;
use crate::logger::DEFAULT_FILTER;
use anyhow::{Result, anyhow};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub store: Store,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "file"
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const ENV_PREFIX: &str = "TRAVELX";

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("store.backend", "file")?
        .set_default("store.path", ".travelx/tokens.json")?
        .set_default("log.filter", DEFAULT_FILTER)
        .map_err(|e| anyhow!(e))
}

/// Defaults, then the settings file, then `TRAVELX__SECTION__KEY` variables.
///
/// An explicit `path` must exist; the built-in path is optional.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    load(path, None)
}

/// `env` replaces the process environment when set.
fn load(path: Option<&str>, env: Option<Map<String, String>>) -> Result<Settings> {
    let file = match path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(SETTINGS_PATH).required(false),
    };

    let settings: Settings = defaults()?
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(env),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

/// Defaults overlaid with an in-memory TOML document.
pub fn parse_settings_str(toml: &str) -> Result<Settings> {
    let settings: Settings = defaults()?
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
