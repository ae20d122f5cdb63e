//! HttpGenerator -- concrete [`Generator`] implementation for the LLM server.
//!
//! Sends `{dialog, settings}` to `POST {endpoint}/v1/generate` and reads
//! `{response}` back. Settings are loaded from disk for every request and
//! the chat title is substituted into the system prompt before the first
//! attempt. Transient failures are retried according to a [`RetryPolicy`].

use std::path::Path;
use std::time::Duration;

use parley_core::generation::generator::Generator;
use parley_core::generation::prompt::apply_context_label;
use parley_core::generation::retry::RetryPolicy;
use parley_types::generation::{GenerateRequest, GenerateResponse, GenerationError};

use crate::settings::load_settings;

/// Per-request timeout. Generation on a loaded server can take minutes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Path of the generation route relative to the endpoint.
const GENERATE_PATH: &str = "/v1/generate";

/// Generation client for the LLM server.
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl HttpGenerator {
    /// Create a client for the server at `endpoint` (e.g. `http://llm-server:8000`).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry policy (useful for testing).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> String {
        format!("{}{GENERATE_PATH}", self.endpoint)
    }

    /// A single request/response exchange.
    async fn post(&self, request: &GenerateRequest, attempt: u32) -> Result<String, GenerationError> {
        tracing::debug!(attempt, lines = request.dialog.len(), "Sending generation request");

        let response = self
            .client
            .post(self.url())
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        Ok(body.response)
    }
}

impl Generator for HttpGenerator {
    async fn send(
        &self,
        dialog: Vec<String>,
        settings_path: &Path,
        context_label: &str,
    ) -> Result<String, GenerationError> {
        let mut settings = load_settings(settings_path).await?;
        apply_context_label(&mut settings, context_label)?;

        let request = GenerateRequest { dialog, settings };
        let request = &request;
        self.retry.run(|attempt| self.post(request, attempt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn settings_file(tmp: &TempDir, prompt: &str) -> PathBuf {
        let file = tmp.path().join("luna_bot.json");
        let body = serde_json::json!({
            "system_prompt": prompt,
            "temperature": 0.8,
            "top_k": 40,
            "response_tokens": 128,
        });
        tokio::fs::write(&file, body.to_string()).await.unwrap();
        file
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_send_posts_dialog_and_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "Fine, thanks!" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let settings = settings_file(&tmp, "You are Luna, chatting in %s.").await;
        let generator = HttpGenerator::new(server.uri()).unwrap();

        let reply = generator
            .send(
                vec!["Alice: hello".to_string(), "Bob: how are you".to_string()],
                &settings,
                "Book club",
            )
            .await
            .unwrap();
        assert_eq!(reply, "Fine, thanks!");

        let requests = server.received_requests().await.unwrap();
        let body = requests[0].body_json::<serde_json::Value>().unwrap();
        assert_eq!(
            body["dialog"],
            serde_json::json!(["Alice: hello", "Bob: how are you"])
        );
        assert_eq!(
            body["settings"]["system_prompt"],
            "You are Luna, chatting in Book club."
        );
        assert_eq!(body["settings"]["top_k"], 40);
        assert_eq!(body["settings"]["rate_tokens"], 0);
    }

    #[tokio::test]
    async fn test_bad_placeholder_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let settings = settings_file(&tmp, "You are Luna.").await;
        let generator = HttpGenerator::new(server.uri()).unwrap();

        let err = generator
            .send(vec!["Bob: hi".to_string()], &settings, "Book club")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Placeholder { found: 0 }));
    }

    #[tokio::test]
    async fn test_missing_settings_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let generator = HttpGenerator::new(server.uri()).unwrap();

        let err = generator
            .send(vec![], &tmp.path().join("missing.json"), "Book club")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Settings { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_budget_spent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("CUDA out of memory"))
            .expect(3)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let settings = settings_file(&tmp, "In %s.").await;
        let generator = HttpGenerator::new(server.uri())
            .unwrap()
            .with_retry_policy(fast_retry());

        let err = generator
            .send(vec!["Bob: hi".to_string()], &settings, "Book club")
            .await
            .unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "CUDA out of memory");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "Back." })),
            )
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let settings = settings_file(&tmp, "In %s.").await;
        let generator = HttpGenerator::new(server.uri())
            .unwrap()
            .with_retry_policy(fast_retry());

        let reply = generator
            .send(vec!["Bob: hi".to_string()], &settings, "Book club")
            .await
            .unwrap();
        assert_eq!(reply, "Back.");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let settings = settings_file(&tmp, "In %s.").await;
        let generator = HttpGenerator::new(server.uri())
            .unwrap()
            .with_retry_policy(RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::from_millis(1),
            });

        let err = generator
            .send(vec!["Bob: hi".to_string()], &settings, "Book club")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let generator = HttpGenerator::new("http://llm-server:8000/").unwrap();
        assert_eq!(generator.url(), "http://llm-server:8000/v1/generate");
    }
}
