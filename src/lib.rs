pub mod config;
pub mod handlers_health;
pub mod handlers_photo;
pub mod photo;
pub mod photo_search;
pub mod search_backend;
pub mod search_query;
pub mod warp_helpers;

use warp::Filter;

use photo_search::PhotoSearch;
use warp_helpers::{cors, handle_rejection};

/// Full route tree: photo search, health probes, CORS, request logging and
/// rejection recovery.
pub fn build_routes(
    photo_search: PhotoSearch,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    let health_routes = handlers_health::build_health_routes(photo_search.clone());
    let photo_routes = handlers_photo::build_photo_routes(photo_search);

    health_routes
        .or(photo_routes)
        .with(cors())
        .with(warp::log("imago_search"))
        .recover(handle_rejection)
}
