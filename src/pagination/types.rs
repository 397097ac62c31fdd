//! Pagination types
//!
//! The vendor wraps every paged collection in an envelope carrying
//! `total_pages` next to the `data` array.

use crate::error::{Error, Result};
use serde_json::Value;

/// One parsed page of a paged collection
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope {
    /// Total pages the collection spans
    pub total_pages: u64,
    /// Records on this page
    pub data: Vec<Value>,
}

impl PageEnvelope {
    /// Parse a page envelope
    ///
    /// `total_pages` may arrive as a number or a numeric string. An envelope
    /// without `total_pages` is only accepted when `page` is not the probe
    /// page, since later pages are read for their `data` alone.
    pub fn parse(body: Value, page: u64) -> Result<Self> {
        let Value::Object(mut map) = body else {
            return Err(Error::pagination(page, "envelope is not a JSON object"));
        };

        let total_pages = match map.get("total_pages") {
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| Error::pagination(page, format!("invalid total_pages: {n}")))?,
            Some(Value::String(s)) => s
                .parse()
                .map_err(|_| Error::pagination(page, format!("invalid total_pages: {s}")))?,
            Some(other) => {
                return Err(Error::pagination(
                    page,
                    format!("invalid total_pages: {other}"),
                ))
            }
            None if page == 1 => {
                return Err(Error::pagination(page, "envelope has no 'total_pages'"))
            }
            None => 0,
        };

        let data = match map.remove("data") {
            Some(Value::Array(items)) => items,
            // `{}` is how an empty page comes back once normalized
            Some(Value::Object(o)) if o.is_empty() => Vec::new(),
            Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(Error::pagination(
                    page,
                    format!("'data' is not an array: {other}"),
                ))
            }
            None => return Err(Error::pagination(page, "envelope has no 'data'")),
        };

        Ok(Self { total_pages, data })
    }
}

/// Tracks progress while walking a paged collection
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Last page fetched
    pub page: u64,
    /// Total pages reported by the probe
    pub total_pages: u64,
    /// Records collected so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page
    pub fn add_page(&mut self, page: u64, records: usize) {
        self.page = page;
        self.total_fetched += records as u64;
    }

    /// Check whether every page has been fetched
    pub fn is_done(&self) -> bool {
        self.page >= self.total_pages
    }
}
