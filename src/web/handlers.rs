use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{run_scenarios_with, Forecaster, ScenarioOverride, StatisticsReport};
use crate::error::ForecastError;
use crate::io;
use crate::models::{
    Forecast, ForecastParameters, ValidationLimits, PERIODS_PER_YEAR,
};

use super::state::AppState;

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

#[derive(Debug)]
pub struct WebError(ForecastError);

impl From<ForecastError> for WebError {
    fn from(e: ForecastError) -> Self {
        WebError(e)
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type) = match &self.0 {
            ForecastError::InvalidParameter { .. } | ForecastError::ParseError(_) => {
                (actix_web::http::StatusCode::BAD_REQUEST, "Bad Request")
            }
            ForecastError::DivisionUndefined(_) => (
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ),
        };
        HttpResponse::build(status).json(ErrorBody {
            error: error_type.to_string(),
            details: self.0.to_string(),
            field: self.0.field().map(str::to_string),
        })
    }
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// Forecast inputs; omitted values fall back to the server defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    initial_population: Option<f64>,
    periodic_addition: Option<f64>,
    annual_growth_rate: Option<f64>,
    horizon_periods: Option<u32>,
    horizon_years: Option<u32>,
    start_date: Option<NaiveDate>,
}

impl ForecastRequest {
    fn resolve(
        &self,
        defaults: &ForecastParameters,
        limits: &ValidationLimits,
    ) -> Result<ForecastParameters, ForecastError> {
        let horizon_periods = match (self.horizon_periods, self.horizon_years) {
            (Some(_), Some(_)) => {
                return Err(ForecastError::invalid(
                    "horizon_periods",
                    "give either horizon_years or horizon_periods, not both",
                ))
            }
            (Some(periods), None) => periods,
            (None, Some(years)) => years.checked_mul(PERIODS_PER_YEAR).ok_or_else(|| {
                ForecastError::invalid("horizon_years", "value is too large")
            })?,
            (None, None) => defaults.horizon_periods,
        };
        let params = ForecastParameters::new(
            self.initial_population.unwrap_or(defaults.initial_population),
            self.periodic_addition.unwrap_or(defaults.periodic_addition),
            self.annual_growth_rate.unwrap_or(defaults.annual_growth_rate),
            horizon_periods,
            self.start_date.unwrap_or(defaults.start_date),
        )?;
        params.validate_with(limits)?;
        Ok(params)
    }
}

#[derive(Serialize)]
struct DefaultsResponse<'a> {
    parameters: &'a ForecastParameters,
    limits: &'a ValidationLimits,
    scenarios: &'a IndexMap<String, ScenarioOverride>,
}

#[derive(Serialize)]
struct ForecastResponse {
    forecast: Forecast,
    statistics: StatisticsReport,
    linear: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioRequest {
    #[serde(flatten)]
    base: ForecastRequest,
    scenarios: Option<IndexMap<String, ScenarioOverride>>,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    format: Option<String>,
}

fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn defaults(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(DefaultsResponse {
        parameters: &state.defaults,
        limits: &state.limits,
        scenarios: &state.scenarios,
    })
}

pub async fn forecast(
    state: web::Data<AppState>,
    body: web::Json<ForecastRequest>,
) -> Result<HttpResponse, WebError> {
    let params = body.resolve(&state.defaults, &state.limits)?;
    let forecaster = Forecaster::new(&params);
    let (forecast, statistics) = forecaster.report()?;
    Ok(HttpResponse::Ok().json(ForecastResponse {
        linear: forecaster.linear_series(),
        forecast,
        statistics,
    }))
}

pub async fn scenarios(
    state: web::Data<AppState>,
    body: web::Json<ScenarioRequest>,
) -> Result<HttpResponse, WebError> {
    let params = body.base.resolve(&state.defaults, &state.limits)?;
    let overrides = body.scenarios.as_ref().unwrap_or(&state.scenarios);
    let results = run_scenarios_with(&params, overrides, Some(&state.limits))?;
    Ok(HttpResponse::Ok().json(results))
}

pub async fn export(
    state: web::Data<AppState>,
    query: web::Query<ExportQuery>,
    body: web::Json<ForecastRequest>,
) -> Result<HttpResponse, WebError> {
    let params = body.resolve(&state.defaults, &state.limits)?;
    let (forecast, statistics) = Forecaster::new(&params).report()?;
    let fmt = query.format.as_deref().unwrap_or("csv");

    match fmt {
        "csv" => Ok(attachment(
            "text/csv",
            "forecast_monthly.csv",
            io::periods_csv_bytes(&forecast, state.csv_delimiter)?,
        )),
        "csv-yearly" => Ok(attachment(
            "text/csv",
            "forecast_yearly.csv",
            io::years_csv_bytes(&forecast, state.csv_delimiter)?,
        )),
        "json" => Ok(attachment(
            "application/json",
            "forecast.json",
            io::to_json_string(&forecast, &statistics, state.pretty_json)?.into_bytes(),
        )),
        "xlsx" => Ok(attachment(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "forecast.xlsx",
            io::excel_bytes(&forecast, &statistics)?,
        )),
        _ => Err(WebError(ForecastError::ParseError(format!(
            "Unsupported export format: {fmt}. Use csv, csv-yearly, json or xlsx."
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::App;

    fn make_app(
        state: AppState,
    ) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .route("/api/defaults", web::get().to(defaults))
            .route("/api/forecast", web::post().to(forecast))
            .route("/api/scenarios", web::post().to(scenarios))
            .route("/api/export", web::post().to(export))
    }

    // -----------------------------------------------------------------------
    // Request resolution
    // -----------------------------------------------------------------------

    #[test]
    fn test_resolve_uses_defaults() {
        let params = ForecastRequest::default()
            .resolve(&ForecastParameters::default(), &ValidationLimits::default())
            .unwrap();
        assert_eq!(params, ForecastParameters::default());
    }

    #[test]
    fn test_resolve_years() {
        let request = ForecastRequest {
            horizon_years: Some(2),
            ..ForecastRequest::default()
        };
        let params = request
            .resolve(&ForecastParameters::default(), &ValidationLimits::default())
            .unwrap();
        assert_eq!(params.horizon_periods, 24);
    }

    #[test]
    fn test_resolve_rejects_both_horizons() {
        let request = ForecastRequest {
            horizon_years: Some(2),
            horizon_periods: Some(24),
            ..ForecastRequest::default()
        };
        let err = request
            .resolve(&ForecastParameters::default(), &ValidationLimits::default())
            .unwrap_err();
        assert_eq!(err.field(), Some("horizon_periods"));
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    #[actix_web::test]
    async fn test_defaults_endpoint() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/defaults")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["parameters"]["initial_population"], 60000.0);
        assert_eq!(body["limits"]["max_horizon_periods"], 600);
        assert!(body["scenarios"]["aggressive"].is_object());
    }

    #[actix_web::test]
    async fn test_forecast_success() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/forecast")
            .set_json(serde_json::json!({
                "initial_population": 1000,
                "periodic_addition": 0,
                "annual_growth_rate": 0,
                "horizon_periods": 12
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let periods = body["forecast"]["periods"].as_array().unwrap();
        assert_eq!(periods.len(), 12);
        assert!(periods.iter().all(|p| p["population"] == 1000));
        assert_eq!(body["statistics"]["total_growth"], 0.0);
        assert_eq!(body["linear"].as_array().unwrap().len(), 12);
    }

    #[actix_web::test]
    async fn test_forecast_invalid_parameter() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/forecast")
            .set_json(serde_json::json!({ "initial_population": -5 }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["field"], "initial_population");
    }

    #[actix_web::test]
    async fn test_forecast_horizon_limit() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/forecast")
            .set_json(serde_json::json!({ "horizon_years": 51 }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_scenarios_default_set() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/scenarios")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let names: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(names.len(), 4);
        assert!(body["base"]["end_population"].as_i64().unwrap() > 60_000);
    }

    #[actix_web::test]
    async fn test_scenarios_custom_set() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/scenarios")
            .set_json(serde_json::json!({
                "horizon_years": 1,
                "scenarios": {
                    "flat": { "annual_growth_rate": 0.0, "periodic_addition": 0.0 }
                }
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["flat"]["end_population"], 60000);
        assert_eq!(body["flat"]["total_growth_percent"], 0.0);
    }

    #[actix_web::test]
    async fn test_export_csv() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/export?format=csv")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body = actix_test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("period;date;month"));
        assert_eq!(text.lines().count(), 61);
    }

    #[actix_web::test]
    async fn test_export_xlsx() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/export?format=xlsx")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body = actix_test::read_body(resp).await;
        assert_eq!(&body[..2], b"PK");
    }

    #[actix_web::test]
    async fn test_export_unknown_format() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/export?format=pdf")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }
}
