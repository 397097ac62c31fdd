//! Data source seam between the engine and the vendor API

use crate::error::Result;
use crate::http::RequestParams;
use async_trait::async_trait;
use serde_json::Value;

/// Where the engine reads surveys, questions and responses from
///
/// [`crate::api::AlchemerApi`] is the production implementation. Errors
/// keep their kind: a fetch that ran out of retries surfaces as
/// [`crate::Error::RetriesExhausted`] and the engine decides what that
/// means for the stream.
#[async_trait]
pub trait SurveySource: Send + Sync {
    /// All surveys matching `params`
    async fn surveys(&self, params: &RequestParams) -> Result<Vec<Value>>;

    /// Questions of one survey
    async fn questions(&self, survey_id: &str) -> Result<Vec<Value>>;

    /// Responses of one survey matching `params`, across every page
    async fn survey_responses(&self, survey_id: &str, params: &RequestParams)
        -> Result<Vec<Value>>;
}
