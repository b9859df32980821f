use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_with::{serde_as, TimestampSeconds};
use crate::manager_forecast::check_entry;
use crate::manager_forecast::errors::ForecastError;
use crate::manager_forecast::models::{ForecastFeed, RawForecastEntry};
use crate::manager_owm::errors::OWMError;

/// Unit system requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

#[derive(Deserialize, Default)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Deserialize)]
pub struct WeatherBlock {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct Sys {
    pub country: Option<String>,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

#[derive(Deserialize)]
pub struct CurrentDocument {
    pub name: Option<String>,
    pub sys: Option<Sys>,
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<WeatherBlock>,
    pub wind: Option<Wind>,
    pub visibility: Option<f64>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct ForecastItem {
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    pub dt: Option<DateTime<Utc>>,
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<WeatherBlock>,
}

#[derive(Deserialize)]
pub struct ForecastCity {
    pub timezone: Option<i32>,
}

#[derive(Deserialize)]
pub struct ForecastDocument {
    pub list: Option<Vec<ForecastItem>>,
    pub city: Option<ForecastCity>,
}

/// Current conditions for one city, as shown on the city view
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city: String,
    pub country: Option<String>,
    pub condition: String,
    pub description: String,
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub visibility: Option<f64>,
}

impl TryFrom<CurrentDocument> for CurrentConditions {
    type Error = OWMError;

    fn try_from(doc: CurrentDocument) -> Result<Self, Self::Error> {
        let weather = doc.weather.into_iter().next()
            .ok_or_else(|| OWMError::NoData("no weather conditions in response".into()))?;
        let main = doc.main
            .ok_or_else(|| OWMError::Malformed("current conditions without main block".into()))?;
        let temp = main.temp
            .ok_or_else(|| OWMError::Malformed("current conditions without temperature".into()))?;

        Ok(CurrentConditions {
            city: doc.name.unwrap_or_default(),
            country: doc.sys.and_then(|s| s.country),
            condition: weather.main,
            description: weather.description,
            temp,
            feels_like: main.feels_like,
            humidity: main.humidity,
            pressure: main.pressure,
            wind_speed: doc.wind.and_then(|w| w.speed),
            visibility: doc.visibility,
        })
    }
}

impl TryFrom<ForecastDocument> for ForecastFeed {
    type Error = OWMError;

    fn try_from(doc: ForecastDocument) -> Result<Self, Self::Error> {
        let list = doc.list
            .ok_or_else(|| OWMError::NoData("forecast response without list".into()))?;

        let entries = list.into_iter()
            .enumerate()
            .map(|(index, item)| forecast_entry(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let city_offset = doc.city
            .and_then(|c| c.timezone)
            .and_then(FixedOffset::east_opt);

        Ok(ForecastFeed { entries, city_offset })
    }
}

/// Converts one list item into a checked forecast entry
///
/// # Arguments
///
/// * 'index' - position in the provider list
/// * 'item' - the raw list item
fn forecast_entry(index: usize, item: ForecastItem) -> Result<RawForecastEntry, ForecastError> {
    let missing = |what: &str| ForecastError::Validation(format!("entry {}: missing {}", index, what));

    let time = item.dt.ok_or_else(|| missing("dt"))?;
    let main = item.main.ok_or_else(|| missing("main"))?;
    let entry = RawForecastEntry {
        time,
        temp_min: main.temp_min.ok_or_else(|| missing("main.temp_min"))?,
        temp_max: main.temp_max.ok_or_else(|| missing("main.temp_max"))?,
        condition: item.weather.into_iter().next().ok_or_else(|| missing("weather"))?.main,
    };
    check_entry(index, &entry)?;

    Ok(entry)
}
