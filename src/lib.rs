//! # Alchemer Tap
//!
//! Extracts surveys, questions, responses and per-question answers from
//! the Alchemer v5 REST API and emits them as JSON-lines schema, record
//! and state messages, syncing incrementally from persisted bookmarks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alchemer_tap::{
//!     api::AlchemerApi, config::TapConfig, engine::SyncEngine, output::JsonLinesSink,
//!     schema::Catalog, state::StateManager, Result,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let api = AlchemerApi::from_config(&config)?;
//!     let state = StateManager::from_file("state.json")?;
//!
//!     let mut engine = SyncEngine::new(api, JsonLinesSink::stdout(), Catalog::new(), state);
//!     engine.run().await?;
//!     engine.state().save_to_file("state.json").await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          SyncEngine                             │
//! │  survey phase → questions     response phase → answers          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──┬──────────────┬────────────────┐
//! │  AlchemerApi │    Paginator     │  Timezone    │  RecordSink    │
//! ├──────────────┼──────────────────┼──────────────┼────────────────┤
//! │ Surveys      │ total_pages walk │ EST / EDT    │ JSON lines     │
//! │ Responses    │ HttpClient       │ → UTC        │ Memory         │
//! │ Contacts     │ Fixed retry      │              │ State          │
//! └──────────────┴──────────────────┴──────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod output;
pub mod pagination;
pub mod schema;
pub mod state;
pub mod timezone;
pub mod types;

pub use error::{Error, Result};
