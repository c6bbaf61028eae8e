/// LibreTranslate-compatible translation client.
///
/// Only the source languages listed in the config are considered translatable;
/// everything else is reported as unsupported so the caller classifies the
/// original text.
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::language::LanguageCode;
use crate::translation::{TranslateError, Translator};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Clone)]
pub struct LibreTranslateConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub source_languages: Vec<LanguageCode>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LibreTranslateClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    source_languages: Vec<LanguageCode>,
}

impl LibreTranslateClient {
    /// # Errors
    /// Fails when the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: LibreTranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build translation HTTP client")?;
        let mut base_url =
            Url::parse(&config.base_url).context("invalid translation base URL")?;
        // `join` replaces the last segment unless the path ends in `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join("translate")
            .context("failed to build translation URL")?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            source_languages: config.source_languages,
        })
    }
}

impl Translator for LibreTranslateClient {
    fn supports(&self, source: &LanguageCode, target: &LanguageCode) -> bool {
        source != target && self.source_languages.contains(source)
    }

    fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source: source.as_str(),
            target: target.as_str(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: TranslateResponse = response.json()?;
        if payload.translated_text.trim().is_empty() {
            return Err(TranslateError::EmptyOutput);
        }

        debug!(
            source = %source,
            target = %target,
            chars = text.chars().count(),
            "translated text"
        );
        Ok(payload.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: String, api_key: Option<&str>) -> LibreTranslateClient {
        LibreTranslateClient::new(LibreTranslateConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            source_languages: vec![LanguageCode::parse("fr").unwrap()],
            timeout: Duration::from_secs(5),
        })
        .expect("client builds")
    }

    fn fr() -> LanguageCode {
        LanguageCode::parse("fr").unwrap()
    }

    #[test]
    fn translates_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/translate").json_body(json!({
                "q": "je suis heureux",
                "source": "fr",
                "target": "en",
                "format": "text",
                "api_key": "secret"
            }));
            then.status(200)
                .json_body(json!({ "translatedText": "I am happy" }));
        });

        let translated = client(server.base_url(), Some("secret"))
            .translate("je suis heureux", &fr(), &LanguageCode::english())
            .expect("translation succeeds");

        mock.assert();
        assert_eq!(translated, "I am happy");
    }

    #[test]
    fn base_path_is_kept_with_or_without_trailing_slash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/libre/translate");
            then.status(200)
                .json_body(json!({ "translatedText": "hello" }));
        });

        for base_url in [server.url("/libre"), server.url("/libre/")] {
            let translated = client(base_url, None)
                .translate("bonjour", &fr(), &LanguageCode::english())
                .expect("translation succeeds");
            assert_eq!(translated, "hello");
        }
        mock.assert_hits(2);
    }

    #[test]
    fn error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/translate");
            then.status(503).body("overloaded");
        });

        let error = client(server.base_url(), None)
            .translate("bonjour", &fr(), &LanguageCode::english())
            .expect_err("503 must fail");

        assert!(matches!(error, TranslateError::Status { status: 503, .. }));
    }

    #[test]
    fn empty_translation_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/translate");
            then.status(200).json_body(json!({ "translatedText": "  " }));
        });

        let error = client(server.base_url(), None)
            .translate("bonjour", &fr(), &LanguageCode::english())
            .expect_err("blank output must fail");

        assert!(matches!(error, TranslateError::EmptyOutput));
    }

    #[test]
    fn supports_only_configured_sources() {
        let client = client("http://localhost:5000/".to_string(), None);
        let en = LanguageCode::english();
        assert!(client.supports(&fr(), &en));
        assert!(!client.supports(&LanguageCode::parse("de").unwrap(), &en));
        assert!(!client.supports(&en, &en));
    }
}
