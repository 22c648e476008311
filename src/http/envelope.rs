//! Response envelopes and query parameter helpers.

use super::error::ApiError;
use crate::pagination::{Page, PageRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total matching items.
    pub total: u64,
    /// Number of pages.
    pub pages: u64,
}

impl<T> From<&Page<T>> for Pagination {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.request.page(),
            limit: page.request.limit(),
            total: page.total,
            pages: page.page_count(),
        }
    }
}

/// `page` and `limit` query parameters, parsed leniently.
///
/// Non-numeric or zero values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// Requested page.
    pub page: Option<String>,
    /// Requested page size.
    pub limit: Option<String>,
}

impl PageParams {
    /// Builds a page request with `default_limit`, capped at
    /// [`PageRequest::DEFAULT_MAX_LIMIT`].
    #[must_use]
    pub fn request(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(
            lenient_u32(self.page.as_deref()),
            lenient_u32(self.limit.as_deref()),
            default_limit,
            PageRequest::DEFAULT_MAX_LIMIT,
        )
    }
}

/// Parses a non-negative integer, ignoring garbage.
#[must_use]
pub fn lenient_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|text| text.trim().parse().ok())
}

/// Parses an optional RFC 3339 instant from a query parameter.
///
/// # Errors
///
/// Returns a 400 [`ApiError`] naming `field` when the value is malformed.
pub fn parse_instant(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| {
            DateTime::parse_from_rfc3339(text)
                .map(|instant| instant.with_timezone(&Utc))
                .map_err(|err| ApiError::invalid_input(format!("{field}: {err}")))
        })
        .transpose()
}

/// Serializes a value, converting failures into a 500.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when serialization fails.
pub fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::internal)
}

/// Builds `{"success": true, <key>: items, "pagination": {...}}`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when an item fails to serialize.
pub fn paginated<T: Serialize>(key: &str, page: &Page<T>) -> Result<Value, ApiError> {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    body.insert(key.to_owned(), to_value(&page.items)?);
    body.insert("pagination".to_owned(), to_value(&Pagination::from(page))?);
    Ok(Value::Object(body))
}

/// Builds `{"success": true, <key>: items, "count": n}`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when an item fails to serialize.
pub fn counted<T: Serialize>(key: &str, items: &[T]) -> Result<Value, ApiError> {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    body.insert(key.to_owned(), to_value(&items)?);
    body.insert("count".to_owned(), json!(items.len()));
    Ok(Value::Object(body))
}

/// Merges `success: true` into a serialized object body.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when `body` does not serialize to an
/// object.
pub fn flattened<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    match to_value(body)? {
        Value::Object(fields) => {
            let mut merged = Map::new();
            merged.insert("success".to_owned(), Value::Bool(true));
            merged.extend(fields);
            Ok(Value::Object(merged))
        }
        _ => Err(ApiError::internal("response body is not an object")),
    }
}
