use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;
use crate::manager_forecast::aggregate;
use crate::manager_forecast::errors::ForecastError;
use crate::manager_forecast::models::{DayBasis, DayClock};
use crate::manager_owm::errors::OWMError;
use crate::manager_owm::models::Units;
use crate::manager_owm::WeatherSource;
use crate::view::{city_view, ViewState, CITY_REQUIRED, FETCH_FAILED, SERVER_ERROR};

/// Settings that shape a city lookup
#[derive(Debug, Clone, Copy)]
pub struct LookupSettings {
    pub days: usize,
    pub day_basis: DayBasis,
    pub units: Units,
}

/// Handle for one running lookup, its registry entry is released on drop
pub struct LookupTicket<'a> {
    entry: Option<(&'a LookupRegistry, String, u64)>,
    pub token: CancellationToken,
}

impl Drop for LookupTicket<'_> {
    fn drop(&mut self) {
        if let Some((registry, viewer, id)) = self.entry.take() {
            registry.release(&viewer, id);
        }
    }
}

/// Keeps the latest lookup of each identified viewer so a newer lookup can cancel the one
/// it replaces
pub struct LookupRegistry {
    active: Mutex<HashMap<String, (u64, CancellationToken)>>,
    next_id: AtomicU64,
}

impl LookupRegistry {
    pub fn new() -> Self {
        Self { active: Mutex::new(HashMap::new()), next_id: AtomicU64::new(0) }
    }

    /// Registers a new lookup and cancels the viewer's previous one, if any.
    ///
    /// Lookups without a viewer id are not tracked and never superseded.
    ///
    /// # Arguments
    ///
    /// * 'viewer' - identity of whoever asked for the lookup
    pub fn begin(&self, viewer: Option<&str>) -> LookupTicket<'_> {
        let token = CancellationToken::new();
        let Some(viewer) = viewer else {
            return LookupTicket { entry: None, token };
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self.active().insert(viewer.to_string(), (id, token.clone()));
        if let Some((previous_id, previous_token)) = previous {
            info!("lookup {} for {} supersedes lookup {}", id, viewer, previous_id);
            previous_token.cancel();
        }

        LookupTicket { entry: Some((self, viewer.to_string(), id)), token }
    }

    /// Runs a city lookup for a viewer, cancelling the viewer's previous lookup
    ///
    /// # Arguments
    ///
    /// * 'viewer' - identity of whoever asked, `None` for anonymous lookups
    /// * 'source' - where weather data comes from
    /// * 'city' - city name
    /// * 'settings' - forecast length, day basis and units
    pub async fn run<S: WeatherSource>(&self, viewer: Option<&str>, source: &S, city: &str, settings: &LookupSettings) -> ViewState {
        let ticket = self.begin(viewer);
        lookup_city(source, city, settings, &ticket.token).await
    }

    pub fn in_flight(&self) -> usize {
        self.active().len()
    }

    /// Forgets a lookup, unless a newer one already replaced it
    fn release(&self, viewer: &str, id: u64) {
        let mut active = self.active();
        if active.get(viewer).is_some_and(|(current, _)| *current == id) {
            active.remove(viewer);
        }
    }

    fn active(&self) -> MutexGuard<'_, HashMap<String, (u64, CancellationToken)>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Looks up a city and builds its view, unless the token gets cancelled first
///
/// # Arguments
///
/// * 'source' - where weather data comes from
/// * 'city' - city name
/// * 'settings' - forecast length, day basis and units
/// * 'token' - cancelled when a newer lookup replaces this one
pub async fn lookup_city<S: WeatherSource>(source: &S, city: &str, settings: &LookupSettings, token: &CancellationToken) -> ViewState {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            info!("lookup for {} superseded", city);
            ViewState::Superseded
        }
        state = run_lookup(source, city, settings) => state,
    }
}

/// Fetches current conditions and forecast together, then classifies the outcome
async fn run_lookup<S: WeatherSource>(source: &S, city: &str, settings: &LookupSettings) -> ViewState {
    let city = city.trim();
    if city.is_empty() {
        return ViewState::NotFound { message: CITY_REQUIRED.to_string() };
    }

    let (current, forecast) = tokio::join!(source.current(city), source.forecast(city));

    let current = match current {
        Ok(current) => current,
        Err(OWMError::Provider { code, message }) => {
            info!("provider answered {} for {}: {}", code, city, message);
            let message = if message.is_empty() { FETCH_FAILED.to_string() } else { message };
            return ViewState::NotFound { message };
        }
        Err(OWMError::NoData(e)) => {
            warn!("no current conditions for {}: {}", city, e);
            return ViewState::NotFound { message: FETCH_FAILED.to_string() };
        }
        Err(OWMError::Malformed(e)) => {
            error!("malformed current conditions for {}: {}", city, e);
            return ViewState::Error { message: SERVER_ERROR.to_string() };
        }
        Err(e) => {
            error!("failed to get current conditions for {}: {}", city, e);
            return ViewState::Error { message: SERVER_ERROR.to_string() };
        }
    };

    let (days, forecast_unavailable) = match forecast {
        Ok(feed) => {
            let clock = DayClock::resolve(settings.day_basis, feed.city_offset);
            match aggregate(&feed.entries, &clock, settings.days) {
                Ok(days) => (days, false),
                Err(ForecastError::Validation(e)) => {
                    error!("forecast for {} rejected: {}", city, e);
                    return ViewState::Error { message: SERVER_ERROR.to_string() };
                }
            }
        }
        Err(OWMError::Malformed(e)) => {
            error!("forecast for {} rejected: {}", city, e);
            return ViewState::Error { message: SERVER_ERROR.to_string() };
        }
        Err(e) => {
            warn!("no forecast for {}, showing current conditions only: {}", city, e);
            (Vec::new(), true)
        }
    };

    ViewState::Ready(city_view(&current, &days, forecast_unavailable, settings.units))
}
