//! Translation of photo filters into an Elasticsearch request body.
//!
//! Every non-empty filter becomes one clause inside `bool.must`, so a hit has
//! to satisfy all of them. Absent filters are left out entirely rather than
//! sent as match-all clauses.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// Stored field names in the index
pub const FIELD_TITLE: &str = "title";
pub const FIELD_MEDIA_ID: &str = "bildnummer";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_SEARCH_TEXT: &str = "suchtext";
pub const FIELD_DATE: &str = "datum";
pub const FIELD_WIDTH: &str = "breite";
pub const FIELD_HEIGHT: &str = "hoehe";
pub const FIELD_DB: &str = "db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Callers guarantee `page >= 1`; a zero page still maps to offset 0.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// `ceil(total / page_size)` without going through floats.
    pub fn total_pages(&self, total: u64) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(u64::from(self.page_size))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub title: String,
    pub media_id: String,
    pub description: String,
    pub search_text: String,
    pub date_from: String,
    pub date_to: String,
    pub pagination: Pagination,
}

impl SearchFilter {
    pub fn clauses(&self) -> Vec<QueryClause> {
        let mut clauses = Vec::new();

        if !self.title.is_empty() {
            clauses.push(QueryClause::Match {
                field: FIELD_TITLE,
                query: self.title.clone(),
            });
        }

        if !self.media_id.is_empty() {
            clauses.push(QueryClause::Term {
                field: FIELD_MEDIA_ID,
                value: self.media_id.clone(),
            });
        }

        if !self.description.is_empty() {
            clauses.push(QueryClause::Match {
                field: FIELD_DESCRIPTION,
                query: self.description.clone(),
            });
        }

        if !self.search_text.is_empty() {
            clauses.push(QueryClause::Match {
                field: FIELD_SEARCH_TEXT,
                query: self.search_text.clone(),
            });
        }

        if !self.date_from.is_empty() || !self.date_to.is_empty() {
            clauses.push(QueryClause::Range {
                field: FIELD_DATE,
                gte: non_empty(&self.date_from),
                lte: non_empty(&self.date_to),
            });
        }

        clauses
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: BoolQuery {
                must: self.clauses(),
            },
            from: self.pagination.offset(),
            size: self.pagination.limit(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryClause {
    /// Analyzed full-text match.
    Match { field: &'static str, query: String },
    /// Untokenized equality.
    Term { field: &'static str, value: String },
    /// Inclusive range; at least one bound is set.
    Range {
        field: &'static str,
        gte: Option<String>,
        lte: Option<String>,
    },
}

impl QueryClause {
    pub fn to_json(&self) -> Value {
        match self {
            QueryClause::Match { field, query } => json!({ "match": { *field: query } }),
            QueryClause::Term { field, value } => {
                json!({ "term": { *field: { "value": value } } })
            }
            QueryClause::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), Value::String(gte.clone()));
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), Value::String(lte.clone()));
                }
                json!({ "range": { *field: bounds } })
            }
        }
    }
}

impl Serialize for QueryClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoolQuery {
    pub must: Vec<QueryClause>,
}

impl Serialize for BoolQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Must<'a> {
            must: &'a [QueryClause],
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("bool", &Must { must: &self.must })?;
        map.end()
    }
}

/// Body of a `POST /{index}/_search` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: BoolQuery,
    pub from: u64,
    pub size: u32,
}
