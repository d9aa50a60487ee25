//! HTTP handler functions for the ranch map API.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use ranch_map_analysis::{RanchAnalysis, analyze};
use ranch_map_server_models::{AnalyzeRequest, AnalyzeResponse, ApiError, ApiHealth};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        profile: state.profile.id.clone(),
        region_count: state.regions.len(),
    })
}

/// `GET /api/info`
///
/// Returns the operator contact block for the dashboard header.
pub async fn info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.profile.info)
}

/// `GET /get_cattle`
///
/// Advances the herd one step and returns positions, per-county counts,
/// and (depending on the profile) density alerts and heatmap points.
pub async fn get_cattle(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.poll())
}

/// `POST /analyze_ranch`
///
/// Bad coordinates answer 400; a failing weather lookup answers 502. Both
/// use the `{ "error": ... }` body.
pub async fn analyze_ranch(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    let coordinate = body.coordinate();
    let mut rng = state.request_rng();

    match analyze(state.weather.as_ref(), coordinate, &mut rng).await {
        Ok(analysis) => HttpResponse::Ok().json(to_response(analysis)),
        Err(e) if e.is_client_error() => {
            log::debug!("Rejected ranch analysis request: {e}");
            HttpResponse::BadRequest().json(ApiError::new(e))
        }
        Err(e) => {
            log::error!("Ranch analysis for {coordinate} failed: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e))
        }
    }
}

/// Turns JSON extraction failures (missing fields, wrong content type,
/// malformed body) into the standard error body with a 400.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON payload: {err}");
    let response = HttpResponse::BadRequest().json(ApiError::new(&err));
    InternalError::from_response(err, response).into()
}

fn to_response(analysis: RanchAnalysis) -> AnalyzeResponse {
    AnalyzeResponse {
        ndvi: analysis.ndvi,
        soil_moisture: analysis.soil_moisture,
        temperature: analysis.temperature,
        observed_at: analysis.observed_at,
        dist_water: analysis.distance_to_water_km,
        recommendation: analysis.recommendation.to_string(),
        water_loc: analysis.water_location,
    }
}
