use crate::manager_owm::models::Units;

/// Estimates the feels-like temperature when the provider leaves it out.
///
/// Below 50 °F with wind above 3 mph the NWS wind chill is used, otherwise the
/// NOAA heat index. Result is in the same unit system as the inputs, rounded to
/// one decimal.
///
/// # Arguments
///
/// * 'temp' - air temperature in provider units
/// * 'humidity' - relative humidity in percent
/// * 'wind_speed' - wind speed in provider units
/// * 'units' - unit system of temp and wind_speed
pub fn feels_like(temp: f64, humidity: f64, wind_speed: f64, units: Units) -> f64 {
    let temp_f = to_fahrenheit(temp, units);
    let mph = to_mph(wind_speed, units);

    let felt_f = if temp_f <= 50.0 && mph > 3.0 {
        wind_chill(temp_f, mph)
    } else {
        heat_index(temp_f, humidity)
    };

    (from_fahrenheit(felt_f, units) * 10.0).round() / 10.0
}

/// https://www.weather.gov/safety/cold-wind-chill-chart
fn wind_chill(temp_f: f64, mph: f64) -> f64 {
    let v = mph.powf(0.16);
    35.74 + 0.6215 * temp_f - 35.75 * v + 0.4275 * temp_f * v
}

/// Rothfusz regression with the NOAA low/high humidity adjustments.
/// https://www.wpc.ncep.noaa.gov/html/heatindex_equation.shtml
fn heat_index(t: f64, rh: f64) -> f64 {
    let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
    if simple < 80.0 {
        return simple;
    }

    let hi = -42.379
        + 2.04901523 * t
        + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 0.00683783 * t * t
        - 0.05481717 * rh * rh
        + 0.00122874 * t * t * rh
        + 0.00085282 * t * rh * rh
        - 0.00000199 * t * t * rh * rh;

    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi - ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt()
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        hi + ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0)
    } else {
        hi
    }
}

fn to_fahrenheit(temp: f64, units: Units) -> f64 {
    match units {
        Units::Metric => temp * 1.8 + 32.0,
        Units::Imperial => temp,
        Units::Standard => (temp - 273.15) * 1.8 + 32.0,
    }
}

fn from_fahrenheit(temp_f: f64, units: Units) -> f64 {
    match units {
        Units::Metric => (temp_f - 32.0) / 1.8,
        Units::Imperial => temp_f,
        Units::Standard => (temp_f - 32.0) / 1.8 + 273.15,
    }
}

fn to_mph(speed: f64, units: Units) -> f64 {
    match units {
        Units::Imperial => speed,
        Units::Metric | Units::Standard => speed * 3.6 / 1.609344,
    }
}
