use serde_json::json;
use std::convert::Infallible;
use warp::{reject, Filter, Rejection, Reply};

use crate::photo_search::PhotoSearch;
use crate::warp_helpers::{with_search, BackendUnavailable};

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub async fn ready_check(photo_search: PhotoSearch) -> Result<impl Reply, Rejection> {
    match photo_search.ping().await {
        Ok(()) => Ok(warp::reply::json(&json!({
            "status": "ready",
            "search_backend": "connected",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))),
        Err(e) => {
            log::error!("Search backend ping failed: {}", e);
            Err(reject::custom(BackendUnavailable {
                message: format!("Search backend unavailable: {}", e),
            }))
        }
    }
}

pub fn build_health_routes(
    photo_search: PhotoSearch,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let ready = warp::path("ready")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_search(photo_search))
        .and_then(ready_check);

    health.or(ready)
}
