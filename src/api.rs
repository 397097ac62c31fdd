//! Alchemer v5 API surface
//!
//! Typed entry points for the vendor endpoints the tap knows. Every call
//! goes through [`HttpClient::fetch`]; response collections go through the
//! [`Paginator`].

use crate::config::TapConfig;
use crate::engine::SurveySource;
use crate::error::Result;
use crate::http::{Envelope, HttpClient, RequestParams};
use crate::pagination::Paginator;
use crate::types::scalar_to_string;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the Alchemer v5 REST API
#[derive(Debug)]
pub struct AlchemerApi {
    client: HttpClient,
    option_fetch_delay: Duration,
}

impl AlchemerApi {
    /// Create an API client from tap config
    pub fn from_config(config: &TapConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::with_config(config.client_config())?)
            .with_option_fetch_delay(config.option_fetch_delay()))
    }

    /// Create an API client on top of an HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            option_fetch_delay: Duration::ZERO,
        }
    }

    /// Pause between per-question option fetches in [`Self::all_survey_options`]
    #[must_use]
    pub fn with_option_fetch_delay(mut self, delay: Duration) -> Self {
        self.option_fetch_delay = delay;
        self
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn get(&self, segments: &[&str], params: &RequestParams) -> Result<Value> {
        self.client.fetch(segments, params, Envelope::Unwrap).await
    }

    async fn get_list(&self, segments: &[&str], params: &RequestParams) -> Result<Vec<Value>> {
        self.get(segments, params).await.map(into_records)
    }

    // ========================================================================
    // Surveys
    // ========================================================================

    /// List surveys (the vendor returns every survey on one page)
    pub async fn surveys(&self, params: &RequestParams) -> Result<Vec<Value>> {
        self.get_list(&["survey"], params).await
    }

    /// Get one survey
    pub async fn survey(&self, survey_id: &str) -> Result<Value> {
        self.get(&["survey", survey_id], &RequestParams::new()).await
    }

    /// List a survey's questions
    pub async fn questions(&self, survey_id: &str) -> Result<Vec<Value>> {
        self.get_list(&["survey", survey_id, "surveyquestion"], &RequestParams::new())
            .await
    }

    /// List the options of one question
    pub async fn question_options(&self, survey_id: &str, question_id: &str) -> Result<Vec<Value>> {
        self.get_list(
            &[
                "survey",
                survey_id,
                "surveyquestion",
                question_id,
                "surveyoption",
            ],
            &RequestParams::new(),
        )
        .await
    }

    /// Options of every question in a survey, each tagged with `question_id`
    ///
    /// Sleeps the configured option fetch delay after each question. A
    /// question whose option fetch exhausts its retries contributes nothing.
    pub async fn all_survey_options(&self, survey_id: &str) -> Result<Vec<Value>> {
        let questions = self.questions(survey_id).await?;
        let mut options = Vec::new();

        for question in &questions {
            let Some(question_id) = question.get("id") else {
                debug!("Skipping question without id in survey {}", survey_id);
                continue;
            };
            let question_key = scalar_to_string(question_id);

            match self.question_options(survey_id, &question_key).await {
                Ok(found) => {
                    options.extend(found.into_iter().map(|mut option| {
                        if let Value::Object(map) = &mut option {
                            map.insert("question_id".to_string(), question_id.clone());
                        }
                        option
                    }));
                }
                Err(e) if e.is_exhausted() => {
                    warn!("No options for question {}: {}", question_key, e);
                }
                Err(e) => return Err(e),
            }

            if !self.option_fetch_delay.is_zero() {
                tokio::time::sleep(self.option_fetch_delay).await;
            }
        }

        Ok(options)
    }

    /// All responses of a survey, across every page
    pub async fn survey_responses(
        &self,
        survey_id: &str,
        params: &RequestParams,
    ) -> Result<Vec<Value>> {
        Paginator::new(&self.client)
            .fetch_all_pages(&["survey", survey_id, "surveyresponse"], params)
            .await
    }

    // ========================================================================
    // Contact lists
    // ========================================================================

    /// List contact lists
    pub async fn contact_lists(&self) -> Result<Vec<Value>> {
        self.get_list(&["contactlist"], &RequestParams::new()).await
    }

    /// Get one contact list
    pub async fn contact_list(&self, list_id: &str) -> Result<Value> {
        self.get(&["contactlist", list_id], &RequestParams::new())
            .await
    }

    /// List the contacts of a contact list
    pub async fn contacts(&self, list_id: &str) -> Result<Vec<Value>> {
        self.get_list(
            &["contactlist", list_id, "contactlistcontact"],
            &RequestParams::new(),
        )
        .await
    }

    /// Get one contact of a contact list
    pub async fn contact(&self, list_id: &str, contact_id: &str) -> Result<Value> {
        self.get(
            &["contactlist", list_id, "contactlistcontact", contact_id],
            &RequestParams::new(),
        )
        .await
    }

    // ========================================================================
    // Campaigns
    // ========================================================================

    /// List a survey's campaigns
    pub async fn campaigns(&self, survey_id: &str) -> Result<Vec<Value>> {
        self.get_list(&["survey", survey_id, "surveycampaign"], &RequestParams::new())
            .await
    }

    /// Get one campaign
    pub async fn campaign(&self, survey_id: &str, campaign_id: &str) -> Result<Value> {
        self.get(
            &["survey", survey_id, "surveycampaign", campaign_id],
            &RequestParams::new(),
        )
        .await
    }

    /// List a campaign's email messages
    pub async fn campaign_emails(&self, survey_id: &str, campaign_id: &str) -> Result<Vec<Value>> {
        self.get_list(
            &[
                "survey",
                survey_id,
                "surveycampaign",
                campaign_id,
                "emailmessage",
            ],
            &RequestParams::new(),
        )
        .await
    }

    /// Get one campaign email message
    pub async fn campaign_email(
        &self,
        survey_id: &str,
        campaign_id: &str,
        email_id: &str,
    ) -> Result<Value> {
        self.get(
            &[
                "survey",
                survey_id,
                "surveycampaign",
                campaign_id,
                "emailmessage",
                email_id,
            ],
            &RequestParams::new(),
        )
        .await
    }

    /// List a campaign's contacts and their response status
    pub async fn campaign_contacts(&self, survey_id: &str, campaign_id: &str) -> Result<Vec<Value>> {
        self.get_list(
            &[
                "survey",
                survey_id,
                "surveycampaign",
                campaign_id,
                "surveycontact",
            ],
            &RequestParams::new(),
        )
        .await
    }
}

#[async_trait]
impl SurveySource for AlchemerApi {
    async fn surveys(&self, params: &RequestParams) -> Result<Vec<Value>> {
        AlchemerApi::surveys(self, params).await
    }

    async fn questions(&self, survey_id: &str) -> Result<Vec<Value>> {
        AlchemerApi::questions(self, survey_id).await
    }

    async fn survey_responses(
        &self,
        survey_id: &str,
        params: &RequestParams,
    ) -> Result<Vec<Value>> {
        AlchemerApi::survey_responses(self, survey_id, params).await
    }
}

/// Turn an unwrapped payload into a list of records
///
/// Arrays are the records themselves, the empty-object sentinel means no
/// records, and any other value is a single record.
pub fn into_records(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) if map.is_empty() => Vec::new(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClientConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_api(server: &MockServer) -> AlchemerApi {
        let config = HttpClientConfig::builder()
            .base_url(format!("{}/v5", server.uri()))
            .credentials("tok", "sec")
            .max_attempts(2)
            .retry_wait(Duration::from_millis(1))
            .build();
        AlchemerApi::new(HttpClient::with_config(config).unwrap())
    }

    async fn mount_data(server: &MockServer, endpoint: &str, data: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result_ok": true, "data": data})),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_into_records() {
        assert_eq!(into_records(json!([{"id": 1}])), vec![json!({"id": 1})]);
        assert!(into_records(json!({})).is_empty());
        assert!(into_records(Value::Null).is_empty());
        assert_eq!(into_records(json!({"id": 9})), vec![json!({"id": 9})]);
    }

    #[test]
    fn test_from_config() {
        let mut config = TapConfig::new("t", "s", "api.alchemer.com");
        config.option_fetch_delay_seconds = 2;
        let api = AlchemerApi::from_config(&config).unwrap();

        assert_eq!(api.option_fetch_delay, Duration::from_secs(2));
        assert_eq!(
            api.client().config().base_url.as_deref(),
            Some("https://api.alchemer.com/v5")
        );
    }

    #[tokio::test]
    async fn test_surveys_and_questions() {
        let server = MockServer::start().await;
        mount_data(&server, "/v5/survey/", json!([{"id": 1}, {"id": 2}])).await;
        mount_data(
            &server,
            "/v5/survey/1/surveyquestion/",
            json!([{"id": 10, "type": "RADIO"}]),
        )
        .await;

        let api = test_api(&server);
        assert_eq!(api.surveys(&RequestParams::new()).await.unwrap().len(), 2);
        assert_eq!(
            api.questions("1").await.unwrap(),
            vec![json!({"id": 10, "type": "RADIO"})]
        );
    }

    #[tokio::test]
    async fn test_single_entities() {
        let server = MockServer::start().await;
        mount_data(&server, "/v5/survey/7/", json!({"id": 7, "title": "NPS"})).await;
        mount_data(&server, "/v5/contactlist/3/", json!({"id": 3})).await;
        mount_data(
            &server,
            "/v5/contactlist/3/contactlistcontact/44/",
            json!({"id": 44, "email_address": "a@example.com"}),
        )
        .await;
        mount_data(&server, "/v5/survey/7/surveycampaign/5/", json!({"id": 5})).await;
        mount_data(
            &server,
            "/v5/survey/7/surveycampaign/5/emailmessage/8/",
            json!({"id": 8}),
        )
        .await;

        let api = test_api(&server);
        assert_eq!(api.survey("7").await.unwrap()["title"], "NPS");
        assert_eq!(api.contact_list("3").await.unwrap()["id"], 3);
        assert_eq!(
            api.contact("3", "44").await.unwrap()["email_address"],
            "a@example.com"
        );
        assert_eq!(api.campaign("7", "5").await.unwrap()["id"], 5);
        assert_eq!(api.campaign_email("7", "5", "8").await.unwrap()["id"], 8);
    }

    #[tokio::test]
    async fn test_list_endpoints() {
        let server = MockServer::start().await;
        mount_data(&server, "/v5/contactlist/", json!([{"id": 1}, {"id": 2}])).await;
        mount_data(
            &server,
            "/v5/contactlist/1/contactlistcontact/",
            json!([{"id": 11}]),
        )
        .await;
        mount_data(&server, "/v5/survey/7/surveycampaign/", json!([{"id": 5}])).await;
        mount_data(
            &server,
            "/v5/survey/7/surveycampaign/5/emailmessage/",
            json!([{"id": 8}, {"id": 9}]),
        )
        .await;
        mount_data(
            &server,
            "/v5/survey/7/surveycampaign/5/surveycontact/",
            json!([]),
        )
        .await;

        let api = test_api(&server);
        assert_eq!(api.contact_lists().await.unwrap().len(), 2);
        assert_eq!(api.contacts("1").await.unwrap().len(), 1);
        assert_eq!(api.campaigns("7").await.unwrap().len(), 1);
        assert_eq!(api.campaign_emails("7", "5").await.unwrap().len(), 2);
        assert!(api.campaign_contacts("7", "5").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_survey_options_tags_question_id() {
        let server = MockServer::start().await;
        mount_data(
            &server,
            "/v5/survey/7/surveyquestion/",
            json!([{"id": 1}, {"id": 2}, {"id": 3}]),
        )
        .await;
        mount_data(
            &server,
            "/v5/survey/7/surveyquestion/1/surveyoption/",
            json!([{"id": 100, "value": "Yes"}, {"id": 101, "value": "No"}]),
        )
        .await;
        mount_data(
            &server,
            "/v5/survey/7/surveyquestion/2/surveyoption/",
            json!([]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v5/survey/7/surveyquestion/3/surveyoption/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let api = test_api(&server).with_option_fetch_delay(Duration::from_millis(1));
        let options = api.all_survey_options("7").await.unwrap();

        assert_eq!(
            options,
            vec![
                json!({"id": 100, "value": "Yes", "question_id": 1}),
                json!({"id": 101, "value": "No", "question_id": 1}),
            ]
        );
    }

    #[tokio::test]
    async fn test_survey_responses_paginates() {
        let server = MockServer::start().await;
        for page in 1..=2 {
            Mock::given(method("GET"))
                .and(path("/v5/survey/7/surveyresponse/"))
                .and(query_param("page", page.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "total_pages": 2,
                    "data": [{"id": format!("{page}")}]
                })))
                .mount(&server)
                .await;
        }

        let api = test_api(&server);
        let responses = SurveySource::survey_responses(&api, "7", &RequestParams::new())
            .await
            .unwrap();
        assert_eq!(responses, vec![json!({"id": "1"}), json!({"id": "2"})]);
    }
}
