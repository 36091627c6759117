// src/server/mod.rs

use serde::Serialize;
use std::{collections::HashMap, convert::Infallible, sync::Arc, time::Instant};
use tracing::{error, info, warn};
use warp::{
    http::{
        header::{HeaderValue, WWW_AUTHENTICATE},
        StatusCode,
    },
    reply::Response,
    Filter, Rejection, Reply,
};

use crate::config::Credentials;
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::report::{catalogue, fetch_report, ReportKind};

pub mod auth;

pub use auth::{with_basic_auth, Unauthorized};

/// Read-only state shared by every request.
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn PageFetcher>, credentials: Credentials) -> Arc<Self> {
        Arc::new(Self {
            fetcher,
            credentials: Arc::new(credentials),
        })
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error: message }), status)
        .into_response()
}

fn error_reply(err: &ScrapeError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, &err.public_message())
}

/// `year` (or the legacy `ano`) as a non-zero integer.
pub fn parse_year(params: &HashMap<String, String>) -> Result<i32, ScrapeError> {
    let raw = params
        .get("year")
        .or_else(|| params.get("ano"))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScrapeError::InvalidInput("Parameter 'year' is required".to_string()))?;
    match raw.parse::<i32>() {
        Ok(0) => Err(ScrapeError::InvalidInput(
            "Parameter 'year' is required".to_string(),
        )),
        Ok(year) => Ok(year),
        Err(_) => Err(ScrapeError::InvalidInput(format!(
            "Parameter 'year' must be an integer, got '{}'",
            raw
        ))),
    }
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn health_check() -> Result<Response, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "vitiscraper"
    }))
    .into_response())
}

async fn list_reports(_user: String) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&catalogue()).into_response())
}

async fn report_handler(
    route: String,
    user: String,
    params: HashMap<String, String>,
    state: Arc<AppState>,
) -> Result<Response, Rejection> {
    let kind = ReportKind::from_route(&route).ok_or_else(warp::reject::not_found)?;

    let year = match parse_year(&params) {
        Ok(y) => y,
        Err(e) => {
            warn!(route = %route, user = %user, error = %e, "rejected request");
            return Ok(error_reply(&e));
        }
    };

    let start = Instant::now();
    match fetch_report(state.fetcher.as_ref(), kind.config(), year).await {
        Ok(records) => {
            info!(
                route = %route,
                year,
                records = records.len(),
                elapsed = ?start.elapsed(),
                "served report"
            );
            Ok(warp::reply::json(&records).into_response())
        }
        Err(e) => {
            warn!(route = %route, year, error = %e, elapsed = ?start.elapsed(), "report failed");
            Ok(error_reply(&e))
        }
    }
}

/// All routes, without rejection handling.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let reports = warp::path!("vitibrasil" / "reports")
        .and(warp::get())
        .and(with_basic_auth(state.credentials.clone()))
        .and_then(list_reports);

    let report = warp::path!("vitibrasil" / String)
        .and(warp::get())
        .and(with_basic_auth(state.credentials.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state))
        .and_then(report_handler);

    health.or(reports).unify().or(report).unify()
}

/// Routes with rejections turned into JSON error responses.
pub fn api(state: Arc<AppState>) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    routes(state).recover(handle_rejection).unify()
}

pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.find::<Unauthorized>().is_some() {
        let mut resp = json_error(StatusCode::UNAUTHORIZED, "Unauthorized Access");
        resp.headers_mut().insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static("Basic realm=\"Authentication Required\""),
        );
        return Ok(resp);
    }
    if err.is_not_found() {
        return Ok(json_error(StatusCode::NOT_FOUND, "Not found"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }
    error!("unhandled rejection: {:?}", err);
    Ok(json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
    ))
}
