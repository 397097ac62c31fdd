//! Execution engine module
//!
//! Drives the two sync phases against a [`SurveySource`] and hands every
//! schema, record and state checkpoint to a [`RecordSink`].
//!
//! # Overview
//!
//! - Survey phase: surveys filtered by the `modified_on` bookmark, each
//!   followed by its questions.
//! - Response phase: every survey's responses filtered by the
//!   `date_submitted` bookmark, each followed by its expanded answers.
//!
//! Both phases run sequentially and end with a state checkpoint.

mod source;
pub mod transform;
mod types;

pub use source::SurveySource;
pub use types::SyncStats;

use crate::error::Result;
use crate::http::RequestParams;
use crate::output::RecordSink;
use crate::schema::{Catalog, SURVEY, SURVEY_QUESTION, SURVEY_RESPONSE, SURVEY_RESPONSE_DATA};
use crate::state::StateManager;
use crate::types::scalar_to_string;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use transform::{
    as_object_mut, bookmark_filter, expand_answers, normalize_timestamps, prepare_response,
    record_id, RESPONSE_CURSOR, SURVEY_CURSOR, SURVEY_FILTER_FIELD,
};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<S, K> {
    /// Vendor data
    source: S,
    /// Message consumer
    sink: K,
    /// Stream definitions
    catalog: Catalog,
    /// Bookmarks
    state: StateManager,
    /// Stamped on every record of the run
    extracted_at: DateTime<Utc>,
    /// Statistics
    stats: SyncStats,
}

impl<S: SurveySource, K: RecordSink> SyncEngine<S, K> {
    /// Create a new sync engine
    pub fn new(source: S, sink: K, catalog: Catalog, state: StateManager) -> Self {
        Self {
            source,
            sink,
            catalog,
            state,
            extracted_at: Utc::now(),
            stats: SyncStats::default(),
        }
    }

    /// Override the extraction timestamp stamped on records
    #[must_use]
    pub fn with_extraction_time(mut self, extracted_at: DateTime<Utc>) -> Self {
        self.extracted_at = extracted_at;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Consume the engine, returning the sink and the final state
    pub fn into_parts(self) -> (K, StateManager) {
        (self.sink, self.state)
    }

    /// Run the survey phase, then the response phase
    pub async fn run(&mut self) -> Result<SyncStats> {
        let start = Instant::now();

        self.sync_surveys().await?;
        self.sync_responses().await?;

        self.stats.duration_ms = start.elapsed().as_millis() as u64;
        self.log_summary();

        Ok(self.stats.clone())
    }

    /// Surveys changed since the `modified_on` bookmark, each with its questions
    pub async fn sync_surveys(&mut self) -> Result<()> {
        info!("Syncing stream: {}", SURVEY);

        let bookmark = self.state.get_bookmark(SURVEY, SURVEY_CURSOR);
        let params = bookmark_filter(SURVEY_FILTER_FIELD, bookmark);
        let fetched = self.source.surveys(&params).await;
        let surveys = self.degrade_exhausted(fetched, "survey list")?;

        if !surveys.is_empty() {
            self.sink.write_schema(&self.catalog.survey)?;
            self.sink.write_schema(&self.catalog.survey_question)?;
        }

        for mut survey in surveys {
            let survey_id = record_id(&survey, SURVEY)?;
            normalize_timestamps(
                as_object_mut(&mut survey, SURVEY)?,
                SURVEY,
                &["created_on", SURVEY_CURSOR],
            )?;
            let modified = survey
                .get(SURVEY_CURSOR)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            self.sink.write_record(SURVEY, survey, self.extracted_at)?;
            self.stats.add_row(SURVEY);
            self.state.advance_bookmark(SURVEY, SURVEY_CURSOR, &modified);

            let key = scalar_to_string(&survey_id);
            let fetched = self.source.questions(&key).await;
            let questions =
                self.degrade_exhausted(fetched, &format!("questions of survey {key}"))?;
            debug!("Survey {}: {} questions", key, questions.len());

            for mut question in questions {
                as_object_mut(&mut question, SURVEY_QUESTION)?
                    .insert("survey_id".to_string(), survey_id.clone());
                self.sink
                    .write_record(SURVEY_QUESTION, question, self.extracted_at)?;
                self.stats.add_row(SURVEY_QUESTION);
            }
        }

        self.sink.write_state(self.state.state())
    }

    /// Responses submitted since the `date_submitted` bookmark, across all
    /// surveys, each followed by its answers
    pub async fn sync_responses(&mut self) -> Result<()> {
        info!("Syncing stream: {}", SURVEY_RESPONSE);

        let params = bookmark_filter(
            RESPONSE_CURSOR,
            self.state.get_bookmark(SURVEY_RESPONSE, RESPONSE_CURSOR),
        );
        let fetched = self.source.surveys(&RequestParams::new()).await;
        let surveys = self.degrade_exhausted(fetched, "survey list")?;
        let mut schemas_declared = false;

        for survey in surveys {
            let survey_id = record_id(&survey, SURVEY)?;
            let key = scalar_to_string(&survey_id);
            let responses = self.source.survey_responses(&key, &params).await?;
            self.stats.surveys_scanned += 1;
            debug!("Survey {}: {} responses", key, responses.len());

            if !responses.is_empty() && !schemas_declared {
                self.sink.write_schema(&self.catalog.survey_response)?;
                self.sink.write_schema(&self.catalog.survey_response_data)?;
                schemas_declared = true;
            }

            for response in responses {
                let prepared = prepare_response(response, &survey_id)?;
                self.state
                    .advance_bookmark(SURVEY_RESPONSE, RESPONSE_CURSOR, &prepared.submitted);

                self.sink
                    .write_record(SURVEY_RESPONSE, prepared.record, self.extracted_at)?;
                self.stats.add_row(SURVEY_RESPONSE);

                let rows = expand_answers(
                    prepared.answers,
                    &survey_id,
                    &prepared.native_id,
                    &prepared.response_id,
                )?;
                for row in rows {
                    self.sink
                        .write_record(SURVEY_RESPONSE_DATA, row, self.extracted_at)?;
                    self.stats.add_row(SURVEY_RESPONSE_DATA);
                }
            }
        }

        self.sink.write_state(self.state.state())
    }

    /// Treat a fetch that ran out of retries as "no data"
    fn degrade_exhausted(&mut self, result: Result<Vec<Value>>, what: &str) -> Result<Vec<Value>> {
        match result {
            Err(e) if e.is_exhausted() => {
                warn!("No data for {}: {}", what, e);
                self.stats.degraded_fetches += 1;
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn log_summary(&self) {
        info!("----------------------");
        for stream in self.catalog.streams() {
            info!("{}: {}", stream.name, self.stats.rows_for(stream.name));
        }
        info!("----------------------");
        if self.stats.degraded_fetches > 0 {
            warn!(
                "{} fetches ran out of retries and were treated as empty",
                self.stats.degraded_fetches
            );
        }
    }
}
