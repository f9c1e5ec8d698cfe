use serde::Serialize;
use std::convert::Infallible;

use warp::http::StatusCode;
use warp::{reject, Filter, Rejection, Reply};

use crate::photo_search::PhotoSearch;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Query parameters that parsed but break a constraint.
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl reject::Reject for ValidationError {}

#[derive(Debug)]
pub struct SearchBackendFailure {
    pub message: String,
}

impl reject::Reject for SearchBackendFailure {}

#[derive(Debug)]
pub struct BackendUnavailable {
    pub message: String,
}

impl reject::Reject for BackendUnavailable {}

pub fn with_search(
    photo_search: PhotoSearch,
) -> impl Filter<Extract = (PhotoSearch,), Error = Infallible> + Clone {
    warp::any().map(move || photo_search.clone())
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(validation_error) = err.find::<ValidationError>() {
        code = StatusCode::UNPROCESSABLE_ENTITY;
        message = validation_error.message.clone();
    } else if let Some(invalid_query) = err.find::<reject::InvalidQuery>() {
        code = StatusCode::UNPROCESSABLE_ENTITY;
        message = invalid_query.to_string();
    } else if let Some(failure) = err.find::<SearchBackendFailure>() {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = failure.message.clone();
    } else if let Some(unavailable) = err.find::<BackendUnavailable>() {
        code = StatusCode::SERVICE_UNAVAILABLE;
        message = unavailable.message.clone();
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorResponse { detail: message }),
        code,
    ))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "OPTIONS"])
}
