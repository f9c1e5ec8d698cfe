use serde::Deserialize;
use warp::{reject, Filter, Rejection, Reply};

use crate::photo_search::PhotoSearch;
use crate::search_query::{Pagination, SearchFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::warp_helpers::{with_search, SearchBackendFailure, ValidationError};

/// Query string of `GET /photos/`. Empty values mean "no filter".
#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bildnummer: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suchtext: String,
    #[serde(default)]
    pub date_from: String,
    #[serde(default)]
    pub date_to: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PhotoQuery {
    pub fn into_filter(self) -> Result<SearchFilter, ValidationError> {
        if self.page < 1 {
            return Err(ValidationError {
                message: "page must be greater than or equal to 1".to_string(),
            });
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError {
                message: format!("page_size must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        Ok(SearchFilter {
            title: self.title,
            media_id: self.bildnummer,
            description: self.description,
            search_text: self.suchtext,
            date_from: self.date_from,
            date_to: self.date_to,
            pagination: Pagination {
                page: self.page,
                page_size: self.page_size,
            },
        })
    }
}

pub async fn search_photos(
    query: PhotoQuery,
    photo_search: PhotoSearch,
) -> Result<impl Reply, Rejection> {
    let filter = query.into_filter().map_err(reject::custom)?;

    match photo_search.search(&filter).await {
        Ok(result) => Ok(warp::reply::json(&result)),
        Err(e) => Err(reject::custom(SearchBackendFailure {
            message: e.to_string(),
        })),
    }
}

pub fn build_photo_routes(
    photo_search: PhotoSearch,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("photos")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<PhotoQuery>())
        .and(with_search(photo_search))
        .and_then(search_photos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: u32, page_size: u32) -> PhotoQuery {
        serde_json::from_value(serde_json::json!({ "page": page, "page_size": page_size }))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let query: PhotoQuery = serde_json::from_str("{}").unwrap();
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.pagination, Pagination::default());
        assert!(filter.title.is_empty());
        assert!(filter.media_id.is_empty());
    }

    #[test]
    fn test_page_bounds() {
        assert!(query(0, 10).into_filter().is_err());
        assert!(query(1, 0).into_filter().is_err());
        assert!(query(1, 101).into_filter().is_err());
        assert!(query(1, 100).into_filter().is_ok());
        assert!(query(1, 1).into_filter().is_ok());
    }

    #[test]
    fn test_source_field_names_map_to_filter() {
        let query: PhotoQuery = serde_json::from_value(serde_json::json!({
            "bildnummer": "12345",
            "suchtext": "berlin",
            "date_to": "2020-12-31"
        }))
        .unwrap();
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.media_id, "12345");
        assert_eq!(filter.search_text, "berlin");
        assert_eq!(filter.date_to, "2020-12-31");
        assert!(filter.date_from.is_empty());
    }
}
