use rand::seq::IndexedRandom;
use serde::Serialize;

/// Backdrop shown while a city lookup is in flight
pub const LOADING_BACKDROP: &str = "/loading1.avif";

pub const FEELS_LIKE_ICON: &str = "/temperature.svg";
pub const HUMIDITY_ICON: &str = "/humidity.svg";
pub const WIND_SPEED_ICON: &str = "/windSpeed.svg";
pub const VISIBILITY_ICON: &str = "/glasses.svg";

const CITY_PICTURES: [&str; 11] = [
    "/cityPictures/world.avif",
    "/cityPictures/world2.avif",
    "/cityPictures/world3.avif",
    "/cityPictures/world4.avif",
    "/cityPictures/world5.avif",
    "/cityPictures/world6.avif",
    "/cityPictures/world7.avif",
    "/cityPictures/world8.avif",
    "/cityPictures/world9.avif",
    "/cityPictures/world10.avif",
    "/cityPictures/world11.avif",
];

/// Full page background matching a condition keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    Sunny,
    Cloud,
    Rainy,
    Snow,
    Storm,
    Mist,
    Foggy,
    Default,
}

impl Backdrop {
    /// Maps a provider condition keyword, case-insensitive, unknown keywords give `Default`
    ///
    /// # Arguments
    ///
    /// * 'condition' - condition keyword such as "Clear" or "Rain"
    pub fn for_condition(condition: &str) -> Backdrop {
        match condition.trim().to_ascii_lowercase().as_str() {
            "clear" => Backdrop::Sunny,
            "clouds" => Backdrop::Cloud,
            "rain" | "drizzle" => Backdrop::Rainy,
            "snow" => Backdrop::Snow,
            "thunderstorm" => Backdrop::Storm,
            "mist" => Backdrop::Mist,
            "fog" => Backdrop::Foggy,
            _ => Backdrop::Default,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Backdrop::Sunny => "/weatherBackgrounds/sunny.avif",
            Backdrop::Cloud => "/weatherBackgrounds/cloud.avif",
            Backdrop::Rainy => "/weatherBackgrounds/rainy.avif",
            Backdrop::Snow => "/weatherBackgrounds/snow.avif",
            Backdrop::Storm => "/weatherBackgrounds/storm.avif",
            Backdrop::Mist => "/weatherBackgrounds/mist.avif",
            Backdrop::Foggy => "/weatherBackgrounds/foggy.avif",
            Backdrop::Default => "/weatherBackgrounds/default.avif",
        }
    }
}

/// Small condition icon used on the current conditions badge and forecast cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Sunny,
    Rainy,
    Cloudy,
    Snowy,
}

impl Icon {
    /// Maps a provider condition keyword, case-insensitive, unknown keywords give the sunny icon
    ///
    /// # Arguments
    ///
    /// * 'condition' - condition keyword
    pub fn for_condition(condition: &str) -> Icon {
        match condition.trim().to_ascii_lowercase().as_str() {
            "rain" => Icon::Rainy,
            "clouds" => Icon::Cloudy,
            "snow" => Icon::Snowy,
            _ => Icon::DEFAULT,
        }
    }

    pub const DEFAULT: Icon = Icon::Sunny;

    pub fn path(&self) -> &'static str {
        match self {
            Icon::Sunny => "/sunny.svg",
            Icon::Rainy => "/rainy.svg",
            Icon::Cloudy => "/cloudy.svg",
            Icon::Snowy => "/snowy.svg",
        }
    }
}

/// Picks one of the home page pictures at random
pub fn random_city_picture() -> &'static str {
    CITY_PICTURES.choose(&mut rand::rng()).copied().unwrap_or(CITY_PICTURES[0])
}
