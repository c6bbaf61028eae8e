/// Text-classification inference client.
///
/// Speaks the Hugging Face inference wire format: the request is
/// `{"inputs": "<text>"}` and the response is either `[[{label, score}, ...]]`
/// or `[{label, score}, ...]`.
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::classification::{ClassificationResult, EmotionModel, ModelError};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct ScoredLabel {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<ScoredLabel>>),
    Single(Vec<ScoredLabel>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<ScoredLabel> {
        match self {
            Self::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Single(scores) => scores,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    url: Url,
    token: Option<String>,
}

impl InferenceClient {
    /// # Errors
    /// Fails when the URL is invalid or the HTTP client cannot be built.
    pub fn new(config: InferenceClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build inference HTTP client")?;
        let url = Url::parse(&config.url).context("invalid inference endpoint URL")?;

        Ok(Self {
            client,
            url,
            token: config.token,
        })
    }
}

impl EmotionModel for InferenceClient {
    fn name(&self) -> &str {
        "remote"
    }

    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
        let body = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: InferenceResponse = response.json()?;
        Ok(payload
            .into_scores()
            .into_iter()
            .map(|scored| ClassificationResult::new(scored.label, scored.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(url: String, token: Option<&str>) -> InferenceClient {
        InferenceClient::new(InferenceClientConfig {
            url,
            token: token.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .expect("client builds")
    }

    #[test]
    fn parses_batched_response_and_sends_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/emotion")
                .header("authorization", "Bearer hf_test")
                .json_body(json!({
                    "inputs": "I am so happy today",
                    "options": { "wait_for_model": true }
                }));
            then.status(200).json_body(json!([[
                { "label": "joy", "score": 0.92 },
                { "label": "surprise", "score": 0.05 }
            ]]));
        });

        let results = client(server.url("/models/emotion"), Some("hf_test"))
            .predict("I am so happy today")
            .expect("prediction succeeds");

        mock.assert();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label.as_str(), "joy");
        assert!((results[0].score - 0.92).abs() < 1e-6);
    }

    #[test]
    fn parses_flat_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200)
                .json_body(json!([{ "label": "fear", "score": 0.7 }]));
        });

        let results = client(server.url("/classify"), None)
            .predict("a dark alley")
            .expect("prediction succeeds");

        assert_eq!(results, vec![ClassificationResult::new("fear", 0.7)]);
    }

    #[test]
    fn error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(500).body("model crashed");
        });

        let error = client(server.url("/classify"), None)
            .predict("hello")
            .expect_err("500 must fail");

        assert!(matches!(error, ModelError::Status { status: 500, .. }));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200).body("not json");
        });

        let error = client(server.url("/classify"), None)
            .predict("hello")
            .expect_err("garbage must fail");

        assert!(matches!(error, ModelError::Http(_)));
    }
}
