//! OpenRouter chat-completions client for vision requests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bainian_core::{ImagePayload, ReplyError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::VisionProvider;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
enum ChatMessage<'a> {
    System { content: &'a str },
    User { content: Vec<ContentPart<'a>> },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Holds one `reqwest::Client`, so a single instance is shared across requests.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_base: String,
    api_key: String,
    user_instruction: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Creates a client whose every call is bounded by `timeout`.
    pub fn new(
        api_base: &str,
        api_key: &str,
        user_instruction: &str,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReplyError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_instruction: user_instruction.to_string(),
            max_tokens,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ReplyError {
        match e.is_timeout() {
            true => ReplyError::Timeout(self.timeout.as_secs()),
            false => ReplyError::Provider(e.to_string()),
        }
    }
}

#[async_trait]
impl VisionProvider for OpenRouterClient {
    async fn complete(&self, model: &str, system_prompt: &str, image: &ImagePayload) -> Result<String, ReplyError> {
        let start = Instant::now();

        let request = ChatRequest {
            model,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage::System { content: system_prompt },
                ChatMessage::User {
                    content: vec![
                        ContentPart::ImageUrl {
                            image_url: ImageUrl { url: image.data_uri() },
                        },
                        ContentPart::Text {
                            text: &self.user_instruction,
                        },
                    ],
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Provider error for {}: {} {}", model, status, body);
            return Err(ReplyError::Provider(format!("provider returned {}: {}", status, body)));
        }

        let resp: ChatResponse = response.json().await.map_err(|e| self.map_transport_error(e))?;

        debug!("Completion from {} in {} ms", model, start.elapsed().as_millis());

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ReplyError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bainian_core::MediaType;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, timeout: Duration) -> OpenRouterClient {
        OpenRouterClient::new(&format!("{}/api/v1/", server.uri()), "sk-test", "return JSON", 512, timeout).unwrap()
    }

    fn image() -> ImagePayload {
        ImagePayload::new(b"hello".to_vec(), MediaType::Png)
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    #[tokio::test]
    async fn test_sends_image_and_instructions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "google/gemini-2.0-flash-001",
                "max_tokens": 512,
                "messages": [
                    {"role": "system", "content": "be warm"},
                    {"role": "user", "content": [
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,aGVsbG8="}},
                        {"type": "text", "text": "return JSON"}
                    ]}
                ]
            })))
            .respond_with(completion(json!("  {\"ok\": true}\n")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, Duration::from_secs(5))
            .complete("google/gemini-2.0-flash-001", "be warm", &image())
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\": true}");
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .complete("m", "s", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::Provider(_)));
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(serde_json::Value::Null))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .complete("m", "s", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .complete("m", "s", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(json!("{}")).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_millis(200))
            .complete("m", "s", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::Timeout(_)));
    }
}
