pub mod errors;
pub mod models;

use crate::manager_forecast::errors::ForecastError;
use crate::manager_forecast::models::{DailySummary, DayClock, RawForecastEntry};

/// Aggregates a 3-hour forecast into daily summaries and keeps the first `days` of them
///
/// # Arguments
///
/// * 'entries' - forecast samples, expected in chronological order
/// * 'clock' - timezone used to decide which day a sample belongs to
/// * 'days' - max number of days to return
pub fn aggregate(entries: &[RawForecastEntry], clock: &DayClock, days: usize) -> Result<Vec<DailySummary>, ForecastError> {
    let mut daily = aggregate_all(entries, clock)?;
    daily.truncate(days);

    Ok(daily)
}

/// Aggregates a 3-hour forecast into one summary per day label.
///
/// Days come out in the order their label was first seen. The condition of a day is
/// taken from its first sample, later samples only widen the min/max temperature.
/// Input order is trusted, not checked.
///
/// # Arguments
///
/// * 'entries' - forecast samples
/// * 'clock' - timezone used to decide which day a sample belongs to
pub fn aggregate_all(entries: &[RawForecastEntry], clock: &DayClock) -> Result<Vec<DailySummary>, ForecastError> {
    let mut daily: Vec<DailySummary> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        check_entry(index, entry)?;
        let day = clock.day_label(entry.time);

        match daily.iter_mut().find(|d| d.day == day) {
            Some(summary) => {
                summary.temp_min = summary.temp_min.min(entry.temp_min);
                summary.temp_max = summary.temp_max.max(entry.temp_max);
            }
            None => daily.push(DailySummary {
                day,
                condition: entry.condition.clone(),
                temp_min: entry.temp_min,
                temp_max: entry.temp_max,
            }),
        }
    }

    Ok(daily)
}

/// Rejects samples that would poison a summary
///
/// # Arguments
///
/// * 'index' - position of the sample in the feed, used in the error message
/// * 'entry' - the sample
pub fn check_entry(index: usize, entry: &RawForecastEntry) -> Result<(), ForecastError> {
    if !entry.temp_min.is_finite() || !entry.temp_max.is_finite() {
        return Err(ForecastError::Validation(format!("entry {}: temperature is not a finite number", index)));
    }
    if entry.temp_min > entry.temp_max {
        return Err(ForecastError::Validation(
            format!("entry {}: temp_min {} above temp_max {}", index, entry.temp_min, entry.temp_max)));
    }
    if entry.condition.trim().is_empty() {
        return Err(ForecastError::Validation(format!("entry {}: empty condition", index)));
    }

    Ok(())
}
