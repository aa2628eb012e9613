//! Gemini client for answer generation via the Generative Language API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{GenerationConfig, GenerationSettings};
use crate::error::{Error, Result};
use crate::providers::llm::LlmProvider;

/// Gemini client authenticated with an API key
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    /// Get the API endpoint URL. The key travels in a header, never in the URL.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Error::generation("GEMINI_API_KEY is not set"));
        }

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        tracing::debug!("Sending {} char prompt to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::generation(format!("Gemini request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse Gemini response: {}", e)))?;

        gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| Error::generation("No text in Gemini response"))
    }

    async fn health_check(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: &str) -> GeminiClient {
        GeminiClient::new(&GenerationSettings {
            base_url: server.uri(),
            api_key: api_key.to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_config_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "PROMPT"}]}],
                "generationConfig": {
                    "temperature": 0.3,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 2048
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Alpha is the first letter."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "test-key");
        let answer = client
            .generate("PROMPT", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(answer, "Alpha is the first letter.");
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server, "k")
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(ref m) if m.contains("quota exceeded")));
    }

    #[tokio::test]
    async fn test_api_key_stays_out_of_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "SUPERSECRETKEY")
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_none());
        assert!(!requests[0].url.as_str().contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let client = GeminiClient::new(&GenerationSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "SUPERSECRETKEY".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = client
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "leaked: {}", err);
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = client_for(&server, "k")
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, "");
        assert!(!client.health_check().await);
        assert!(client
            .generate("p", &GenerationConfig::default())
            .await
            .is_err());
    }

    #[test]
    fn test_model_and_name() {
        let client = GeminiClient::new(&GenerationSettings::default()).unwrap();
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
