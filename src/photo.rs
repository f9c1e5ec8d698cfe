use serde::Serialize;
use serde_json::{Map, Value};

use crate::search_backend::Hit;
use crate::search_query::{
    Pagination, FIELD_DATE, FIELD_DB, FIELD_DESCRIPTION, FIELD_HEIGHT, FIELD_MEDIA_ID,
    FIELD_SEARCH_TEXT, FIELD_TITLE, FIELD_WIDTH,
};

/// A single search hit in API shape.
///
/// Stored values keep their JSON type (`width` may be a number); a field the
/// document does not carry is reported as `""` so "unknown" stays distinct
/// from zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRecord {
    pub id: String,
    #[serde(rename = "mediaId")]
    pub media_id: Value,
    pub description: Value,
    pub title: Value,
    #[serde(rename = "searchText")]
    pub search_text: Value,
    pub date: Value,
    pub width: Value,
    pub height: Value,
    pub db: Value,
}

impl PhotoRecord {
    pub fn from_hit(hit: Hit) -> Self {
        let mut source = hit.source.unwrap_or_default();
        let mut take = |field: &str| stored_or_empty(&mut source, field);

        PhotoRecord {
            id: hit.id,
            media_id: take(FIELD_MEDIA_ID),
            description: take(FIELD_DESCRIPTION),
            title: take(FIELD_TITLE),
            search_text: take(FIELD_SEARCH_TEXT),
            date: take(FIELD_DATE),
            width: take(FIELD_WIDTH),
            height: take(FIELD_HEIGHT),
            db: take(FIELD_DB),
        }
    }
}

fn stored_or_empty(source: &mut Map<String, Value>, field: &str) -> Value {
    match source.remove(field) {
        Some(Value::Null) | None => Value::String(String::new()),
        Some(value) => value,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub photos: Vec<PhotoRecord>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl SearchResult {
    pub fn new(photos: Vec<PhotoRecord>, total: u64, pagination: Pagination) -> Self {
        Self {
            photos,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages: pagination.total_pages(total),
        }
    }
}
