use std::{env, fs};
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;
use crate::manager_forecast::models::DayBasis;
use crate::manager_owm::models::Units;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const API_KEY_ENV: &str = "WEATHER_API_KEY";

#[derive(Deserialize, Debug)]
pub struct General {
    pub log_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Debug)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OpenWeather {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub units: Units,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Forecast {
    #[serde(default = "default_days")]
    pub days: usize,
    #[serde(default)]
    pub day_basis: DayBasis,
}

impl Default for Forecast {
    fn default() -> Self {
        Self { days: default_days(), day_basis: DayBasis::default() }
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub general: General,
    pub web_server: WebServer,
    pub open_weather: OpenWeather,
    #[serde(default)]
    pub forecast: Forecast,
}

fn default_log_level() -> String { "info".into() }
fn default_base_url() -> String { "https://api.openweathermap.org/data/2.5".into() }
fn default_lang() -> String { "en".into() }
fn default_city() -> String { "Tehran".into() }
fn default_timeout_secs() -> u64 { 30 }
fn default_days() -> usize { 3 }

/// Returns a configuration struct for the application and starts logging
///
/// The config file is taken from `--config <path>`, then the `CONFIG_FILE`
/// environment variable, then `config.toml` in the working directory.
/// The `WEATHER_API_KEY` environment variable, when set, replaces `open_weather.api_key`.
pub fn config() -> Result<Config, ConfigError> {
    let config_path = config_path(env::args().skip(1), env::var("CONFIG_FILE").ok());
    let toml = fs::read_to_string(&config_path)
        .map_err(|e| ConfigError(format!("failed to read {}: {}", config_path, e)))?;

    let config = parse_config(&toml, env::var(API_KEY_ENV).ok())?;

    setup_logger(&config.general.log_path, &config.general.log_level, config.general.log_to_stdout)?;

    Ok(config)
}

/// Parses and checks a toml config
///
/// # Arguments
///
/// * 'toml' - config file contents
/// * 'api_key' - api key from the environment, overrides the file value if present
fn parse_config(toml: &str, api_key: Option<String>) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(toml)?;

    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.open_weather.api_key = key.trim().to_string();
    }
    if config.open_weather.api_key.is_empty() {
        return Err(ConfigError::from("no OpenWeatherMap api key, set open_weather.api_key or WEATHER_API_KEY"));
    }
    if config.forecast.days == 0 {
        return Err(ConfigError::from("forecast.days must be at least 1"));
    }

    Ok(config)
}

/// Picks the config file path from command line arguments or environment
///
/// # Arguments
///
/// * 'args' - command line arguments, program name excluded
/// * 'from_env' - value of the CONFIG_FILE environment variable
fn config_path(mut args: impl Iterator<Item = String>, from_env: Option<String>) -> String {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return path;
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }

    from_env.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}
