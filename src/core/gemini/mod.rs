//! HTTP client for the Google Generative Language (Gemini) API.

mod types;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::core::app;
use crate::core::backend::{BackendError, ModelBackend, RawModel};

use types::{ErrorEnvelope, GenerateContentRequest, ListModelsResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";
const PAGE_SIZE: u32 = 1000;

/// Minimal Gemini client: catalog listing and single-shot generation.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client. `timeout` bounds each request; `None` leaves it to the transport.
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = Client::builder().user_agent(app::user_agent());
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        let name = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.base_url, name)
    }

    async fn fetch_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, BackendError> {
        let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        let url = self.models_url();
        log::debug!("GET {} (page token: {:?})", url, page_token);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&query)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<ListModelsResponse>()
            .await
            .map_err(|e| {
                BackendError::Decode(format!(
                    "Failed to parse models response: {}",
                    e.without_url()
                ))
            })
    }
}

impl ModelBackend for GeminiClient {
    async fn list_models(&self) -> Result<Vec<RawModel>, BackendError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            pages += 1;
            models.extend(page.models.into_iter().map(RawModel::from));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    log::warn!("Catalog repeated page token {:?}; stopping", next);
                    break;
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        log::debug!("Listed {} model(s) in {} page(s)", models.len(), pages);
        Ok(models)
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<(), BackendError> {
        let url = self.generate_url(model);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::minimal(prompt, max_output_tokens))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into `BackendError::Api`.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), status.canonical_reason(), &body))
}

/// Parse the error envelope when present; otherwise keep the raw body.
fn api_error(code: u16, reason: Option<&str>, body: &str) -> BackendError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => BackendError::Api {
            code: envelope.error.code.unwrap_or(code),
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(e) => {
            if !body.trim().is_empty() {
                log::warn!("Unparseable error body for HTTP {}: {}", code, e);
            }
            BackendError::Api {
                code,
                status: reason.unwrap_or_default().to_string(),
                message: body.trim().to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::{DefaultClassifier, ErrorClassifier, StatusLabel};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key", &server.uri(), None).unwrap()
    }

    #[test]
    fn generate_url_adds_models_prefix_once() {
        let c = GeminiClient::new("k", "https://example.test/v1beta/", None).unwrap();
        assert_eq!(
            c.generate_url("models/gemini-pro"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            c.generate_url("gemini-pro"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn error_envelope_is_structured() {
        let body = json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        });
        let err = api_error(429, Some("Too Many Requests"), &body.to_string());
        assert_eq!(err.to_string(), "429 RESOURCE_EXHAUSTED: Quota exceeded");
    }

    #[test]
    fn plain_body_keeps_http_reason() {
        let err = api_error(503, Some("Service Unavailable"), "upstream down\n");
        assert_eq!(err.to_string(), "503 Service Unavailable: upstream down");
    }

    #[tokio::test]
    async fn list_models_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("x-goog-api-key", "test-key"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/gemini-1.5-flash", "outputTokenLimit": 8192 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    { "name": "models/gemini-pro", "inputTokenLimit": 30720 },
                    { "name": "models/embedding-001" }
                ],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let models = client(&server).list_models().await.unwrap();
        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "models/gemini-pro",
                "models/embedding-001",
                "models/gemini-1.5-flash"
            ]
        );
        assert_eq!(models[0].input_token_limit, Some(30_720));
        assert_eq!(models[2].output_token_limit, Some(8192));
    }

    #[tokio::test]
    async fn list_models_stops_on_repeated_page_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/gemini-pro" }],
                "nextPageToken": "stuck"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let models = client(&server).list_models().await.unwrap();
        assert_eq!(models.len(), 2);
    }

    #[tokio::test]
    async fn list_models_surfaces_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server).list_models().await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn generate_sends_minimal_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({
                "contents": [{ "parts": [{ "text": "Hi" }] }],
                "generationConfig": { "maxOutputTokens": 1 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "H" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .generate("models/gemini-pro", "Hi", 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generate_quota_error_classifies_as_quota() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted (e.g. check quota).",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate("models/gemini-pro", "Hi", 1)
            .await
            .unwrap_err();
        assert_eq!(
            DefaultClassifier.classify(&err.signal()),
            StatusLabel::QuotaExceeded
        );
    }

    #[tokio::test]
    async fn generate_unknown_model_classifies_as_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-gone:generateContent"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate("models/gemini-gone", "Hi", 1)
            .await
            .unwrap_err();
        assert_eq!(
            DefaultClassifier.classify(&err.signal()),
            StatusLabel::NotFound
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let timeout = Some(Duration::from_secs(2));
        let c = GeminiClient::new("k", "http://127.0.0.1:9", timeout).unwrap();
        let err = c.list_models().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert_eq!(
            DefaultClassifier.classify(&err.signal()),
            StatusLabel::OtherError
        );
    }

    #[tokio::test]
    async fn unreachable_host_ignores_digits_in_model_name() {
        let timeout = Some(Duration::from_secs(2));
        let c = GeminiClient::new("k", "http://127.0.0.1:9", timeout).unwrap();
        let err = c
            .generate("models/gemini-exp-0429", "Hi", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        let signal = err.signal();
        assert_eq!(signal.code, None);
        assert!(!signal.text.contains("0429"));
        assert_eq!(
            DefaultClassifier.classify(&signal),
            StatusLabel::OtherError
        );
    }
}
