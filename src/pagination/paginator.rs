//! Page-number walker for the vendor's paged collections
//!
//! The probe request reads page 1 together with `total_pages`; the
//! remaining pages are requested in order and concatenated after it.

use super::types::{PageEnvelope, PaginationState};
use crate::error::{Error, Result};
use crate::http::{Envelope, HttpClient, RequestParams};
use crate::types::is_truthy;
use serde_json::Value;
use tracing::{debug, info};

/// Walks every page of a collection
#[derive(Debug)]
pub struct Paginator<'a> {
    client: &'a HttpClient,
}

impl<'a> Paginator<'a> {
    /// Create a paginator on top of a client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch all pages and return their records in page order
    ///
    /// A page whose fetch exhausted its retries, or whose envelope is
    /// malformed, fails the whole walk with [`Error::Pagination`].
    pub async fn fetch_all_pages<S: AsRef<str>>(
        &self,
        segments: &[S],
        params: &RequestParams,
    ) -> Result<Vec<Value>> {
        let mut state = PaginationState::new();

        let probe = self.fetch_page(segments, params, 1).await?;
        if !is_truthy(&probe) {
            debug!("Empty envelope, no records");
            return Ok(Vec::new());
        }

        let first = PageEnvelope::parse(probe, 1)?;
        info!("Total pages: {}", first.total_pages);

        state.total_pages = first.total_pages;
        state.add_page(1, first.data.len());
        let mut records = first.data;

        while !state.is_done() {
            let page = state.page + 1;
            let body = self
                .fetch_page(segments, &params.for_page(page), page)
                .await?;
            let envelope = PageEnvelope::parse(body, page)?;
            state.add_page(page, envelope.data.len());
            records.extend(envelope.data);
        }

        debug!(
            "Fetched {} records across {} pages",
            state.total_fetched, state.page
        );
        Ok(records)
    }

    async fn fetch_page<S: AsRef<str>>(
        &self,
        segments: &[S],
        params: &RequestParams,
        page: u64,
    ) -> Result<Value> {
        self.client
            .fetch(segments, params, Envelope::Keep)
            .await
            .map_err(|e| {
                if e.is_exhausted() {
                    Error::pagination(page, e.to_string())
                } else {
                    e
                }
            })
    }
}
