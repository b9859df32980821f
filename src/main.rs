mod errors;
mod logging;
mod initialization;
mod handlers;
mod assets;
mod feels_like;
mod sanitize;
mod view;
mod manager_owm;
mod manager_forecast;
mod manager_lookup;

use actix_web::{web, App, HttpServer};
use log::info;
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_lookup::{LookupRegistry, LookupSettings};
use crate::manager_owm::OpenWeather;

pub struct AppState {
    owm: OpenWeather,
    lookups: LookupRegistry,
    settings: LookupSettings,
    default_city: String,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let state = web::Data::new(AppState {
        owm: OpenWeather::new(&config.open_weather)?,
        lookups: LookupRegistry::new(),
        settings: LookupSettings {
            days: config.forecast.days,
            day_basis: config.forecast.day_basis,
            units: config.open_weather.units,
        },
        default_city: config.open_weather.default_city.clone(),
    });

    info!("listening on {}:{}, days labelled by {:?}",
          config.web_server.bind_address, config.web_server.bind_port, config.forecast.day_basis);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
