use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// Weekday name, english locale regardless of host settings
const DAY_LABEL_FORMAT: &str = "%A";

/// One 3-hour sample of the upstream forecast
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastEntry {
    pub time: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: String,
}

/// Validated forecast payload for one city
#[derive(Debug, Clone, Default)]
pub struct ForecastFeed {
    pub entries: Vec<RawForecastEntry>,
    pub city_offset: Option<FixedOffset>,
}

/// Summary of all samples falling on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub day: String,
    pub condition: String,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Which timezone decides what calendar day a sample belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBasis {
    /// Timezone of the host running the service
    #[default]
    ViewerLocal,
    Utc,
    /// UTC offset the provider reports for the queried city
    CityLocal,
}

/// Resolved timezone used to label days within one aggregation run
#[derive(Debug, Clone, Copy)]
pub enum DayClock {
    Local,
    Fixed(FixedOffset),
}

impl DayClock {
    /// Resolves a day basis into a clock
    ///
    /// A city based clock without a reported city offset falls back to UTC.
    ///
    /// # Arguments
    ///
    /// * 'basis' - configured day basis
    /// * 'city_offset' - UTC offset of the queried city, if known
    pub fn resolve(basis: DayBasis, city_offset: Option<FixedOffset>) -> DayClock {
        match basis {
            DayBasis::ViewerLocal => DayClock::Local,
            DayBasis::Utc => DayClock::Fixed(Utc.fix()),
            DayBasis::CityLocal => match city_offset {
                Some(offset) => DayClock::Fixed(offset),
                None => {
                    warn!("no city offset in forecast, labelling days in UTC");
                    DayClock::Fixed(Utc.fix())
                }
            },
        }
    }

    /// Returns the weekday name of the given instant in this clock's timezone
    ///
    /// # Arguments
    ///
    /// * 'time' - instant to label
    pub fn day_label(&self, time: DateTime<Utc>) -> String {
        match self {
            DayClock::Local => time.with_timezone(&Local).format(DAY_LABEL_FORMAT).to_string(),
            DayClock::Fixed(offset) => time.with_timezone(offset).format(DAY_LABEL_FORMAT).to_string(),
        }
    }
}
