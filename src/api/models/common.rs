use crate::core::error::{RaterError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on the current page, at most `limit` of them
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Total number of pages
    pub pages: u32,
    /// Current page number (1-indexed)
    pub page: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            pages: 0,
            page: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pagination controls sent with list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(RaterError::InvalidInput("page must be a positive integer".to_string()));
        }
        if limit == 0 {
            return Err(RaterError::InvalidInput("limit must be a positive integer".to_string()));
        }
        Ok(Self { page, limit })
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Envelope as sent by the backend; every field besides the items is optional
#[derive(Debug, Deserialize)]
struct RawEnvelope<T> {
    #[serde(alias = "results")]
    items: Vec<T>,
    #[serde(default, alias = "count")]
    total: Option<u64>,
    #[serde(default)]
    pages: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Normalize a list response into a [`Page`].
///
/// Accepts either a page envelope (`{items, total, pages?, page, limit?}`,
/// with `results`/`count` as aliases) or a bare JSON array. A bare array is
/// the whole collection: `total` is its length and there is a single page.
/// When the envelope omits `pages` it is derived from `total` and the limit.
pub fn normalize_page<T: DeserializeOwned>(body: Value, requested: PageRequest) -> Result<Page<T>> {
    let is_envelope = matches!(
        &body,
        Value::Object(map) if map.contains_key("items") || map.contains_key("results")
    );

    match body {
        Value::Array(_) => {
            let items: Vec<T> = serde_json::from_value(body)?;
            Ok(Page {
                total: items.len() as u64,
                pages: 1,
                page: 1,
                items,
            })
        }
        Value::Object(_) if is_envelope => {
            let raw: RawEnvelope<T> = serde_json::from_value(body)?;
            let total = raw.total.unwrap_or(raw.items.len() as u64);
            let limit = raw.limit.filter(|l| *l > 0).unwrap_or(requested.limit);
            let pages = raw.pages.unwrap_or_else(|| page_count(total, limit));
            Ok(Page {
                items: raw.items,
                total,
                pages,
                page: raw.page.unwrap_or(requested.page),
            })
        }
        other => Err(RaterError::DeserializationError(format!(
            "Expected a page envelope or a list, got {}",
            shape_name(&other)
        ))),
    }
}

/// `ceil(total / limit)`
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let limit = u64::from(limit);
    u32::try_from((total + limit - 1) / limit).unwrap_or(u32::MAX)
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object without items",
    }
}

/// Decimal that may arrive as a string (`"4.50"`), a number, or null.
/// Anything unparsable is treated as absent.
pub fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite()))
}

/// Count that may be null or missing; both read as zero
pub fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Optional text where an empty string means "not given"
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
