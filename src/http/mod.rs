//! HTTP client module
//!
//! Provides the vendor HTTP client with bounded retry.
//!
//! # Features
//!
//! - **URL Construction**: Path segments plus credential and caller query parameters
//! - **Bounded Retries**: A fixed number of attempts with a fixed delay, no backoff growth
//! - **Envelope Handling**: Optional unwrapping of the `data` envelope
//! - **Explicit Exhaustion**: Retry exhaustion is a distinct error callers can degrade on

mod client;

pub use client::{
    endpoint_path, Envelope, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestParams,
};

#[cfg(test)]
mod tests;
