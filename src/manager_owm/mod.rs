pub mod errors;
pub mod models;

use std::time::Duration;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use crate::initialization::OpenWeather as OpenWeatherConfig;
use crate::manager_forecast::models::ForecastFeed;
use crate::manager_owm::errors::OWMError;
use crate::manager_owm::models::{CurrentConditions, CurrentDocument, ForecastDocument, Units};

/// Source of current conditions and forecasts for a city
pub trait WeatherSource {
    async fn current(&self, city: &str) -> Result<CurrentConditions, OWMError>;
    async fn forecast(&self, city: &str) -> Result<ForecastFeed, OWMError>;
}

/// Struct for fetching current weather and forecasts from OpenWeatherMap
pub struct OpenWeather {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
    lang: String,
}

impl OpenWeather {
    /// Returns an OpenWeather struct ready for fetching from the provider
    ///
    /// # Arguments
    ///
    /// * 'config' - provider section of the configuration
    pub fn new(config: &OpenWeatherConfig) -> Result<OpenWeather, OWMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units,
            lang: config.lang.clone(),
        })
    }

    /// Fetches current conditions for a city and returns the provider's json untouched,
    /// whatever its status
    ///
    /// # Arguments
    ///
    /// * 'city' - city name as typed by the user
    pub async fn current_document(&self, city: &str) -> Result<Value, OWMError> {
        self.document("weather", city).await
    }

    /// Fetches the 5 day/3 hour forecast for a city and returns the provider's json untouched,
    /// whatever its status
    ///
    /// # Arguments
    ///
    /// * 'city' - city name as typed by the user
    pub async fn forecast_document(&self, city: &str) -> Result<Value, OWMError> {
        self.document("forecast", city).await
    }

    async fn document(&self, endpoint: &str, city: &str) -> Result<Value, OWMError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self.client
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_query()),
                ("lang", self.lang.as_str()),
            ])
            .send().await?;

        let status = res.status();
        let body = res.text().await?;
        debug!("{} for {}: {}", endpoint, city, status);

        Ok(serde_json::from_str(&body)?)
    }
}

impl WeatherSource for OpenWeather {
    async fn current(&self, city: &str) -> Result<CurrentConditions, OWMError> {
        let json = self.current_document(city).await?;
        check_provider_code(&json)?;

        let doc: CurrentDocument = serde_json::from_value(json)?;
        CurrentConditions::try_from(doc)
    }

    async fn forecast(&self, city: &str) -> Result<ForecastFeed, OWMError> {
        let json = self.forecast_document(city).await?;
        check_provider_code(&json)?;

        let doc: ForecastDocument = serde_json::from_value(json)?;
        ForecastFeed::try_from(doc)
    }
}

/// Returns the provider's own status code, sent as a number by some endpoints and as a
/// string by others
///
/// # Arguments
///
/// * 'json' - provider response
pub fn provider_code(json: &Value) -> Option<u16> {
    match json.get("cod")? {
        Value::Number(n) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Turns a non-200 provider code into a provider error carrying the provider's message
///
/// # Arguments
///
/// * 'json' - provider response
fn check_provider_code(json: &Value) -> Result<(), OWMError> {
    match provider_code(json) {
        Some(code) if code != 200 => Err(OWMError::Provider {
            code,
            message: json.get("message").and_then(Value::as_str).unwrap_or_default().to_string(),
        }),
        _ => Ok(()),
    }
}
