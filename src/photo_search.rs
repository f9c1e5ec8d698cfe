use std::sync::Arc;

use log::{debug, error, info};
use thiserror::Error;

use crate::photo::{PhotoRecord, SearchResult};
use crate::search_backend::{BackendError, SearchBackend};
use crate::search_query::SearchFilter;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Backend(#[from] BackendError),
}

#[derive(Clone)]
pub struct PhotoSearch {
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl PhotoSearch {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }

    pub async fn ping(&self) -> Result<(), BackendError> {
        self.backend.ping().await
    }

    /// Runs one query against the index. Backend failures are logged and
    /// returned whole; there is no retry and no partial result.
    pub async fn search(&self, filter: &SearchFilter) -> Result<SearchResult, SearchError> {
        info!("Searching photos with parameters: {:?}", filter);

        let request = filter.to_request();
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Executing search query on '{}': {}",
                self.index,
                serde_json::to_string(&request).unwrap_or_default()
            );
        }

        let response = match self.backend.search(&self.index, &request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Search query failed for {:?}: {}", filter, e);
                return Err(SearchError::Backend(e));
            }
        };

        let total = response.hits.total.value();
        let photos: Vec<PhotoRecord> = response
            .hits
            .hits
            .into_iter()
            .map(PhotoRecord::from_hit)
            .collect();

        info!(
            "Search completed. Found {} total hits, returning {} results",
            total,
            photos.len()
        );

        Ok(SearchResult::new(photos, total, filter.pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_backend::{Hit, Hits, SearchResponse, TotalHits};
    use crate::search_query::{Pagination, SearchRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct StubBackend {
        response: Option<SearchResponse>,
        requests: Mutex<Vec<(String, SearchRequest)>>,
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        async fn search(
            &self,
            index: &str,
            request: &SearchRequest,
        ) -> Result<SearchResponse, BackendError> {
            self.requests
                .lock()
                .unwrap()
                .push((index.to_string(), request.clone()));
            self.response.clone().ok_or_else(|| BackendError::Status {
                status: 503,
                body: "Search failed".to_string(),
            })
        }

        async fn ping(&self) -> Result<(), BackendError> {
            Ok(())
        }
    }

    fn hit(id: &str, title: &str) -> Hit {
        serde_json::from_value(json!({ "_id": id, "_source": { "title": title } })).unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_hits_in_backend_order() {
        let backend = Arc::new(StubBackend {
            response: Some(SearchResponse {
                hits: Hits {
                    total: TotalHits::Count(12),
                    hits: vec![hit("b", "second"), hit("a", "first")],
                },
            }),
            requests: Mutex::new(Vec::new()),
        });
        let search = PhotoSearch::new(backend.clone(), "imago");

        let filter = SearchFilter {
            title: "sunset".to_string(),
            pagination: Pagination {
                page: 2,
                page_size: 5,
            },
            ..Default::default()
        };
        let result = search.search(&filter).await.unwrap();

        let ids: Vec<&str> = result.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(result.total, 12);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 5);
        assert_eq!(result.total_pages, 3);

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "imago");
        assert_eq!(requests[0].1.from, 5);
        assert_eq!(requests[0].1.size, 5);
    }

    #[tokio::test]
    async fn test_backend_failure_is_returned_whole() {
        let backend = Arc::new(StubBackend {
            response: None,
            requests: Mutex::new(Vec::new()),
        });
        let search = PhotoSearch::new(backend.clone(), "imago");

        let err = search.search(&SearchFilter::default()).await.unwrap_err();
        assert!(err.to_string().contains("Search failed"));
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ping_goes_to_backend() {
        let search = PhotoSearch::new(
            Arc::new(StubBackend {
                response: None,
                requests: Mutex::new(Vec::new()),
            }),
            "imago",
        );
        assert!(search.ping().await.is_ok());
    }
}
