use reqwest::{multipart, Client, Response};
use tracing::debug;
use url::Url;

use crate::api::dto::{ChatRequest, ChatResponse, UploadResponse};
use crate::api::response::ApiError;
use crate::models::ChatHistory;

use super::ClientError;

/// Thin wrapper over the upload, chat and history endpoints; PDFs are
/// linked by URL rather than downloaded.
#[derive(Debug, Clone)]
pub struct AskPdfClient {
    http: Client,
    base: Url,
}

impl AskPdfClient {
    pub fn new(server: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(server)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    /// Where the browser (or anything else) can fetch a stored PDF.
    pub fn pdf_url(&self, local_id: &str) -> Result<Url, ClientError> {
        self.endpoint(&format!("pdf/{local_id}"))
    }

    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResponse, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("pdf", part);

        debug!("Uploading {} to {}", file_name, self.base);
        let response = self
            .http
            .post(self.endpoint("upload")?)
            .multipart(form)
            .send()
            .await?;

        Ok(expect_success(response).await?.json().await?)
    }

    pub async fn chat(&self, source_id: &str, query: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint("chats")?)
            .json(&ChatRequest {
                chat_pdf_source_id: source_id.to_string(),
                query: query.to_string(),
            })
            .send()
            .await?;

        let body: ChatResponse = expect_success(response).await?.json().await?;
        Ok(body.text)
    }

    pub async fn history(&self, source_id: &str) -> Result<ChatHistory, ClientError> {
        let response = self
            .http
            .get(self.history_url(source_id)?)
            .send()
            .await?;

        Ok(expect_success(response).await?.json().await?)
    }

    fn history_url(&self, source_id: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint("chats/history/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(source_id);
        Ok(url)
    }
}

async fn expect_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiError>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
