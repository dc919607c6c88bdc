//! HTTP template store client

use async_trait::async_trait;
use interview_config::QuestionSourceConfig;
use interview_core::{Error, QuestionSet, QuestionSource, Result};
use reqwest::Client;
use std::time::Duration;

use super::InterviewTemplate;

/// Fetches templates from `GET {api_url}/api/interview-template`
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    api_url: String,
    room_name: Option<String>,
}

impl HttpQuestionSource {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::QuestionSource(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            room_name: None,
        })
    }

    /// Build from configuration; `None` when no API URL is configured
    pub fn from_config(config: &QuestionSourceConfig) -> Result<Option<Self>> {
        match &config.api_url {
            Some(url) => Self::new(url.as_str(), Duration::from_secs(config.timeout_secs)).map(Some),
            None => Ok(None),
        }
    }

    /// Room the interview runs in, forwarded as `roomName`
    pub fn with_room_name(mut self, room_name: impl Into<String>) -> Self {
        self.room_name = Some(room_name.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/interview-template", self.api_url)
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_questions(&self, template_id: &str) -> Result<QuestionSet> {
        let mut params = vec![("recordId", template_id)];
        if let Some(room) = &self.room_name {
            params.push(("roomName", room.as_str()));
        }

        tracing::info!(template_id, endpoint = %self.endpoint(), "Fetching interview template");

        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::QuestionSource(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::QuestionSource(format!(
                "template store returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::QuestionSource(e.to_string()))?;
        let questions = InterviewTemplate::from_json(&body)?.into_question_set();

        tracing::info!(
            template_id,
            questions = questions.len(),
            "Fetched interview template"
        );
        Ok(questions)
    }
}
