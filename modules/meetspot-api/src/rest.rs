use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::warn;

use meetspot_common::RecommendRequest;
use meetspot_engine::classify;

use crate::AppState;

/// True when both coordinates are finite and on the globe.
pub fn valid_lat_lon(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

pub async fn api_recommend(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendRequest>,
) -> impl IntoResponse {
    if !valid_lat_lon(body.lat, body.lon) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "bad_lat_lon"})),
        )
            .into_response();
    }

    let intent = classify(&body.text);
    match state.engine.recommend(body).await {
        Ok(rec) => Json(rec).into_response(),
        // Fail open: the calling UI renders a 200 envelope rather than
        // crashing on an internal error.
        Err(e) => {
            warn!(error = %e, intent = %intent, "Recommendation failed");
            Json(serde_json::json!({
                "error": e.to_string(),
                "intent": intent.to_string(),
            }))
            .into_response()
        }
    }
}
