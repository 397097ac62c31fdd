//! Pagination module
//!
//! Supports the vendor's page-number collections (`page` query parameter,
//! `total_pages` in the response envelope).
//!
//! # Overview
//!
//! The probe call reads page 1 and the page count; pages 2..=N follow in
//! order and their `data` arrays are appended. There is no de-duplication
//! and no retry coordination beyond what the HTTP client does per page.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{PageEnvelope, PaginationState};
