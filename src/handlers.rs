use actix_web::http::header;
use actix_web::{get, routes, web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use crate::AppState;
use crate::assets::{random_city_picture, LOADING_BACKDROP};
use crate::manager_owm::errors::OWMError;
use crate::sanitize::{city_query, path_segment};
use crate::view::{ViewState, CITY_REQUIRED, SERVER_ERROR};

const VIEWER_HEADER: &str = "X-Viewer-Id";

#[derive(Deserialize, Debug)]
struct CityParams {
    city: Option<String>,
}

/// Registers all routes of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(search)
        .service(weather_proxy)
        .service(forecast_proxy)
        .service(city_required)
        .service(city_weather);
}

#[get("/")]
async fn home() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "background": random_city_picture(),
        "loading": LOADING_BACKDROP,
    }))
}

#[get("/search")]
async fn search(params: web::Query<CityParams>) -> impl Responder {
    info!("{:?}", params);

    match params.city.as_deref().and_then(city_query) {
        Some(city) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/weather/{}", path_segment(&city))))
            .finish(),
        None => HttpResponse::BadRequest().json(json!({ "error": CITY_REQUIRED })),
    }
}

#[get("/api/weather")]
async fn weather_proxy(params: web::Query<CityParams>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let city = proxy_city(&params, &data.default_city);
    proxy_response(data.owm.current_document(city).await, "weather")
}

#[routes]
#[get("/api/forecast")]
#[get("/api/forcast")]
async fn forecast_proxy(params: web::Query<CityParams>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let city = proxy_city(&params, &data.default_city);
    proxy_response(data.owm.forecast_document(city).await, "forecast")
}

#[get("/weather")]
async fn city_required() -> impl Responder {
    view_response(ViewState::NotFound { message: CITY_REQUIRED.to_string() })
}

#[get("/weather/{city}")]
async fn city_weather(req: HttpRequest, city: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let city = city.into_inner();
    let viewer = viewer_id(&req);
    info!("city view for {} requested by {}", city, viewer.as_deref().unwrap_or("anonymous viewer"));

    let state = data.lookups.run(viewer.as_deref(), &data.owm, &city, &data.settings).await;
    debug!("{} lookups in flight", data.lookups.in_flight());

    view_response(state)
}

/// City to proxy for, the configured default when missing or blank
fn proxy_city<'a>(params: &'a CityParams, default_city: &'a str) -> &'a str {
    params.city.as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_city)
}

/// Returns the provider's json as is, or a generic error when it could not be fetched
///
/// # Arguments
///
/// * 'result' - outcome of the upstream call
/// * 'what' - name of the upstream endpoint, for logging
fn proxy_response(result: Result<Value, OWMError>, what: &str) -> HttpResponse {
    match result {
        Ok(json) => HttpResponse::Ok().json(json),
        Err(e) => {
            error!("{} proxy failed: {}", what, e);
            HttpResponse::InternalServerError().json(json!({ "error": SERVER_ERROR }))
        }
    }
}

fn view_response(state: ViewState) -> HttpResponse {
    let mut response = match &state {
        ViewState::Ready(_) => HttpResponse::Ok(),
        ViewState::NotFound { .. } => HttpResponse::NotFound(),
        ViewState::Error { .. } => HttpResponse::InternalServerError(),
        ViewState::Superseded => HttpResponse::Conflict(),
    };

    response.json(state)
}

/// Identifies the viewer by the X-Viewer-Id header, lookups without one are never superseded
fn viewer_id(req: &HttpRequest) -> Option<String> {
    req.headers().get(VIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::initialization::OpenWeather as OpenWeatherConfig;
    use crate::manager_forecast::models::DayBasis;
    use crate::manager_lookup::{LookupRegistry, LookupSettings};
    use crate::manager_owm::models::Units;
    use crate::manager_owm::OpenWeather;
    use super::*;

    fn app_state(base_url: String) -> web::Data<AppState> {
        let config = OpenWeatherConfig {
            base_url,
            api_key: "test-key".into(),
            units: Units::Metric,
            lang: "en".into(),
            default_city: "Tehran".into(),
            timeout_secs: 5,
        };

        web::Data::new(AppState {
            owm: OpenWeather::new(&config).unwrap(),
            lookups: LookupRegistry::new(),
            settings: LookupSettings { days: 3, day_basis: DayBasis::Utc, units: Units::Metric },
            default_city: config.default_city.clone(),
        })
    }

    fn current_json() -> Value {
        json!({
            "weather": [{"main": "Rain", "description": "light rain"}],
            "main": {"temp": 12.5, "feels_like": 11.8, "temp_min": 11.0, "temp_max": 13.0,
                     "pressure": 1016, "humidity": 81},
            "visibility": 8000,
            "wind": {"speed": 4.1},
            "sys": {"country": "GB"},
            "name": "London",
            "cod": 200
        })
    }

    fn forecast_json() -> Value {
        // Tuesday 2024-01-16 00:00 UTC onwards, every 3 hours
        let list: Vec<Value> = (0..40)
            .map(|i| {
                let condition = if i < 8 { "Clouds" } else { "Snow" };
                json!({
                    "dt": 1705363200 + i * 3 * 3600,
                    "main": {"temp_min": 5.0 + (i % 8) as f64, "temp_max": 6.0 + (i % 8) as f64},
                    "weather": [{"main": condition}]
                })
            })
            .collect();

        json!({"cod": "200", "cnt": 40, "list": list, "city": {"name": "London", "timezone": 0}})
    }

    async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[actix_web::test]
    async fn proxies_provider_json_verbatim() {
        let server = MockServer::start().await;
        let not_found = json!({"cod": "404", "message": "city not found"});
        mount(&server, "/weather", ResponseTemplate::new(404).set_body_json(not_found.clone())).await;

        let app = test::init_service(App::new().app_data(app_state(server.uri())).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/weather?city=Atlantis").to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, not_found);
    }

    #[actix_web::test]
    async fn forecast_proxy_defaults_city_and_keeps_old_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Tehran"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": "200", "list": []})))
            .expect(2)
            .mount(&server)
            .await;

        let app = test::init_service(App::new().app_data(app_state(server.uri())).configure(configure)).await;

        for uri in ["/api/forecast", "/api/forcast?city="] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert!(res.status().is_success(), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn proxy_transport_failure_is_server_error() {
        let app = test::init_service(
            App::new().app_data(app_state("http://127.0.0.1:1".into())).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/weather?city=Tehran").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 500);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Server error"}));
    }

    #[actix_web::test]
    async fn city_view_is_ready() {
        let server = MockServer::start().await;
        mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_json())).await;
        mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_json())).await;

        let app = test::init_service(App::new().app_data(app_state(server.uri())).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/weather/London")
            .insert_header((VIEWER_HEADER, "viewer-1"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["state"], "ready");
        assert_eq!(body["city"], "London");
        assert_eq!(body["temperature"], "13 °C");
        assert_eq!(body["background"], "/weatherBackgrounds/rainy.avif");
        assert_eq!(body["forecast"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["forecast"][0], json!({
            "day": "Tuesday", "condition": "Clouds", "icon": "/cloudy.svg", "temp_min": 5, "temp_max": 13
        }));
        assert_eq!(body["forecast"][1]["condition"], "Snow");
        assert_eq!(body["highlights"][3]["value"], "8 km");
    }

    #[actix_web::test]
    async fn unknown_city_is_not_found() {
        let server = MockServer::start().await;
        let not_found = json!({"cod": "404", "message": "city not found"});
        mount(&server, "/weather", ResponseTemplate::new(404).set_body_json(not_found.clone())).await;
        mount(&server, "/forecast", ResponseTemplate::new(404).set_body_json(not_found)).await;

        let app = test::init_service(App::new().app_data(app_state(server.uri())).configure(configure)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/weather/Atlantis").to_request()).await;

        assert_eq!(res.status().as_u16(), 404);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"state": "not_found", "message": "city not found"}));
    }

    #[actix_web::test]
    async fn missing_city_is_required() {
        let app = test::init_service(
            App::new().app_data(app_state("http://127.0.0.1:1".into())).configure(configure)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/weather").to_request()).await;

        assert_eq!(res.status().as_u16(), 404);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], CITY_REQUIRED);
    }

    #[actix_web::test]
    async fn search_redirects_to_clean_city() {
        let app = test::init_service(
            App::new().app_data(app_state("http://127.0.0.1:1".into())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/search?city=%20New%20York!!").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 303);
        assert_eq!(res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()), Some("/weather/New%20York"));

        let req = test::TestRequest::get().uri("/search?city=%3F%21").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn home_picks_a_city_picture() {
        let app = test::init_service(
            App::new().app_data(app_state("http://127.0.0.1:1".into())).configure(configure)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let body: Value = test::read_body_json(res).await;
        assert!(body["background"].as_str().is_some_and(|p| p.starts_with("/cityPictures/")));
        assert_eq!(body["loading"], LOADING_BACKDROP);
    }

    #[actix_web::test]
    async fn viewer_comes_from_header_only() {
        let req = test::TestRequest::default()
            .peer_addr("10.0.0.1:1111".parse().unwrap())
            .to_http_request();
        assert_eq!(viewer_id(&req), None);

        let req = test::TestRequest::default().insert_header((VIEWER_HEADER, " tab-7 ")).to_http_request();
        assert_eq!(viewer_id(&req).as_deref(), Some("tab-7"));
    }

    #[actix_web::test]
    async fn same_address_without_header_is_not_superseded() {
        let server = MockServer::start().await;
        let slow = std::time::Duration::from_millis(200);
        mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_json()).set_delay(slow)).await;
        mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_json())).await;

        let app = test::init_service(App::new().app_data(app_state(server.uri())).configure(configure)).await;
        let first = test::TestRequest::get()
            .uri("/weather/London")
            .peer_addr("10.0.0.1:1111".parse().unwrap())
            .to_request();
        let second = test::TestRequest::get()
            .uri("/weather/Paris")
            .peer_addr("10.0.0.1:2222".parse().unwrap())
            .to_request();

        let (first, second) = tokio::join!(test::call_service(&app, first), test::call_service(&app, second));

        assert_eq!(first.status().as_u16(), 200);
        assert_eq!(second.status().as_u16(), 200);
    }

    #[actix_web::test]
    async fn same_viewer_supersedes_older_lookup() {
        let server = MockServer::start().await;
        let slow = std::time::Duration::from_millis(200);
        mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_json()).set_delay(slow)).await;
        mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_json())).await;

        let state = app_state(server.uri());
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let first = test::TestRequest::get()
            .uri("/weather/London")
            .insert_header((VIEWER_HEADER, "tab-1"))
            .to_request();
        let second = test::TestRequest::get()
            .uri("/weather/Paris")
            .insert_header((VIEWER_HEADER, "tab-1"))
            .to_request();

        let (first, second) = tokio::join!(test::call_service(&app, first), async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            test::call_service(&app, second).await
        });

        assert_eq!(first.status().as_u16(), 409);
        assert_eq!(second.status().as_u16(), 200);
        assert_eq!(state.lookups.in_flight(), 0);
    }
}
