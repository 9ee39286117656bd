use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, multipart, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::ProviderConfig,
    error::{AskPdfError, Result},
    models::{ChatTurn, ProviderSource},
};

use super::DocumentQaProvider;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFileResponse {
    #[serde(default)]
    source_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    source_id: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone)]
pub struct ChatPdfClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ChatPdfClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AskPdfError::Config("API key required for ChatPDF".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AskPdfError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn error_from_response(response: reqwest::Response) -> AskPdfError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        map_http_error(status, retry_after, &body)
    }
}

fn map_http_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> AskPdfError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AskPdfError::ProviderAuth(format!(
            "ChatPDF rejected the API key ({status}): {body}"
        )),
        StatusCode::TOO_MANY_REQUESTS => AskPdfError::ProviderRateLimit { retry_after },
        _ => AskPdfError::Provider(format!("ChatPDF API error ({status}): {body}")),
    }
}

#[async_trait]
impl DocumentQaProvider for ChatPdfClient {
    async fn add_file(&self, bytes: &[u8], file_name: &str) -> Result<ProviderSource> {
        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| AskPdfError::Internal(format!("Invalid MIME type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let url = self.url("sources/add-file");
        debug!(url = %url, bytes = bytes.len(), "Uploading file to ChatPDF");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: AddFileResponse = response.json().await.map_err(|e| {
            AskPdfError::Provider(format!("Failed to parse add-file response: {e}"))
        })?;

        if parsed.source_id.trim().is_empty() {
            return Err(AskPdfError::Provider(
                "add-file response did not contain a sourceId".to_string(),
            ));
        }

        Ok(ProviderSource::new(parsed.source_id))
    }

    async fn chat(&self, source: &ProviderSource, messages: &[ChatTurn]) -> Result<String> {
        let url = self.url("chats/message");
        debug!(url = %url, source_id = %source.provider_id, "Sending chat to ChatPDF");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&ChatRequest {
                source_id: &source.provider_id,
                messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AskPdfError::Provider(format!("Failed to parse chat response: {e}")))?;

        if parsed.content.trim().is_empty() {
            return Err(AskPdfError::Provider(
                "chat response contained empty content".to_string(),
            ));
        }

        Ok(parsed.content)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: Some("sec_test".to_string()),
            base_url: base_url.to_string(),
            timeout_secs: 10,
        }
    }

    async fn client_for(server: &MockServer) -> ChatPdfClient {
        ChatPdfClient::new(&test_config(&server.uri())).unwrap()
    }

    #[test]
    fn test_client_creation_requires_api_key() {
        let mut config = test_config("http://localhost");
        config.api_key = None;
        let result = ChatPdfClient::new(&config);
        assert!(matches!(result, Err(AskPdfError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ChatPdfClient::new(&test_config("http://localhost:1234/v1/")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/v1");
        assert_eq!(
            client.url("chats/message"),
            "http://localhost:1234/v1/chats/message"
        );
    }

    #[tokio::test]
    async fn test_add_file_sends_key_and_returns_source() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sources/add-file"))
            .and(header("x-api-key", "sec_test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "sourceId": "src_abc" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let source = client.add_file(b"%PDF-1.4", "doc.pdf").await.unwrap();
        assert_eq!(source.provider_id, "src_abc");
    }

    #[tokio::test]
    async fn test_add_file_missing_source_id_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sources/add-file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.add_file(b"%PDF", "doc.pdf").await;
        assert!(matches!(result, Err(AskPdfError::Provider(_))));
    }

    #[tokio::test]
    async fn test_chat_sends_single_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/message"))
            .and(header("x-api-key", "sec_test"))
            .and(body_json(serde_json::json!({
                "sourceId": "src_abc",
                "messages": [
                    { "role": "user", "content": "What is this document about?" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "content": "It is about testing." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply = client
            .chat(
                &ProviderSource::new("src_abc"),
                &[ChatTurn::user("What is this document about?")],
            )
            .await
            .unwrap();
        assert_eq!(reply, "It is about testing.");
    }

    #[tokio::test]
    async fn test_chat_error_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/message"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .chat(&ProviderSource::new("src"), &[ChatTurn::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, AskPdfError::ProviderAuth(_)));
        assert!(format!("{err:?}").contains("401"));
    }

    #[tokio::test]
    async fn test_chat_error_429_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/message"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .chat(&ProviderSource::new("src"), &[ChatTurn::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AskPdfError::ProviderRateLimit {
                retry_after: Some(12)
            }
        ));
    }

    #[tokio::test]
    async fn test_chat_error_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/message"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .chat(&ProviderSource::new("src"), &[ChatTurn::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, AskPdfError::Provider(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_history_is_empty_for_chatpdf() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        let history = client.history(&ProviderSource::new("src")).await.unwrap();
        assert!(history.chat_history.is_empty());
    }
}
