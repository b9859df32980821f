use serde::Serialize;
use crate::assets::{Backdrop, Icon, FEELS_LIKE_ICON, HUMIDITY_ICON, VISIBILITY_ICON, WIND_SPEED_ICON};
use crate::feels_like::feels_like;
use crate::manager_forecast::models::DailySummary;
use crate::manager_owm::models::{CurrentConditions, Units};

pub const SERVER_ERROR: &str = "Server error";
pub const CITY_REQUIRED: &str = "City is required";
pub const FETCH_FAILED: &str = "Failed to fetch weather";
const MISSING: &str = "--";

/// What a city page shows after a lookup
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Ready(CityView),
    NotFound { message: String },
    Error { message: String },
    /// A newer lookup from the same viewer took over
    Superseded,
}

#[derive(Debug, Serialize)]
pub struct CityView {
    pub city: String,
    pub country: Option<String>,
    pub condition: String,
    pub description: String,
    pub icon: &'static str,
    pub background: &'static str,
    pub temperature: String,
    pub forecast: Vec<ForecastCard>,
    pub forecast_unavailable: bool,
    pub highlights: Vec<HighlightCard>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ForecastCard {
    pub day: String,
    pub condition: String,
    pub icon: &'static str,
    pub temp_min: i64,
    pub temp_max: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct HighlightCard {
    pub title: &'static str,
    pub value: String,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Builds the city view from current conditions and the aggregated days
///
/// # Arguments
///
/// * 'current' - current conditions of the city
/// * 'days' - aggregated forecast, already cut to the days to show
/// * 'forecast_unavailable' - the forecast could not be fetched, `days` is empty
/// * 'units' - unit system the provider answered in
pub fn city_view(current: &CurrentConditions, days: &[DailySummary], forecast_unavailable: bool, units: Units) -> CityView {
    CityView {
        city: current.city.clone(),
        country: current.country.clone(),
        condition: current.condition.clone(),
        description: current.description.clone(),
        icon: Icon::for_condition(&current.condition).path(),
        background: Backdrop::for_condition(&current.condition).path(),
        temperature: format!("{} {}", round_half_up(current.temp), units.temperature_suffix()),
        forecast: days.iter().map(forecast_card).collect(),
        forecast_unavailable,
        highlights: highlights(current, units),
    }
}

fn forecast_card(day: &DailySummary) -> ForecastCard {
    ForecastCard {
        day: day.day.clone(),
        condition: day.condition.clone(),
        icon: Icon::for_condition(&day.condition).path(),
        temp_min: round_half_up(day.temp_min),
        temp_max: round_half_up(day.temp_max),
    }
}

/// Today's highlight cards, values shown as the provider sent them
fn highlights(current: &CurrentConditions, units: Units) -> Vec<HighlightCard> {
    let felt = current.feels_like.or_else(|| match (current.humidity, current.wind_speed) {
        (Some(humidity), Some(wind_speed)) => Some(feels_like(current.temp, humidity, wind_speed, units)),
        _ => None,
    });

    vec![
        HighlightCard {
            title: "Feels like",
            value: shown(felt, |t| format!("{} {}", t, units.temperature_suffix())),
            icon: FEELS_LIKE_ICON,
            description: "The temperature you actually feel",
        },
        HighlightCard {
            title: "Humidity",
            value: shown(current.humidity, |h| format!("{}%", h)),
            icon: HUMIDITY_ICON,
            description: "The amount of water vapor in the air",
        },
        HighlightCard {
            title: "Wind speed",
            value: shown(current.wind_speed, |w| format!("{} {}", w, units.speed_suffix())),
            icon: WIND_SPEED_ICON,
            description: "How fast the wind is blowing right now",
        },
        HighlightCard {
            title: "Visibility",
            value: shown(current.visibility, |metres| format!("{} km", metres / 1000.0)),
            icon: VISIBILITY_ICON,
            description: "The distance you can clearly see ahead",
        },
    ]
}

/// Formats a reading, or "--" when the provider left it out
fn shown(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| MISSING.to_string())
}

/// Rounds halves towards positive infinity, -2.5 becomes -2
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
