use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::{AskPdfClient, ChatSession, ClientError, SessionDocument, SessionEvent};
use crate::models::ChatRole;

/// Upload `file`, then answer one question per input line until EOF or
/// `/quit`. Returns the final session state.
pub async fn run_terminal<R, W>(
    client: &AskPdfClient,
    file: &Path,
    input: R,
    mut output: W,
) -> Result<ChatSession, ClientError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = ChatSession::new();

    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    let uploaded = client.upload(bytes, &file_name).await?;
    let pdf_url = client.pdf_url(&uploaded.your_source_id)?.to_string();
    session = session.update(SessionEvent::Uploaded(SessionDocument {
        local_id: uploaded.your_source_id,
        source_id: uploaded.chat_pdf_source_id,
        pdf_url: pdf_url.clone(),
    }));

    output
        .write_all(format!("Uploaded {file_name}. View it at {pdf_url}\n").as_bytes())
        .await?;

    let source_id = session
        .source_id()
        .ok_or(ClientError::NoDocument)?
        .to_string();

    match client.history(&source_id).await {
        Ok(history) => {
            session = session.update(SessionEvent::HistoryLoaded(history.chat_history));
            for turn in &session.transcript {
                let label = match turn.role {
                    ChatRole::User => "you",
                    ChatRole::Assistant => "pdf",
                };
                output
                    .write_all(format!("[{label}] {}\n", turn.content).as_bytes())
                    .await?;
            }
        }
        Err(e) => warn!("Error fetching chat history: {}", e),
    }

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query, "/quit" | "/exit") {
            break;
        }

        match client.chat(&source_id, query).await {
            Ok(text) => {
                output.write_all(format!("{text}\n").as_bytes()).await?;
                session = session.update(SessionEvent::Answered {
                    query: query.to_string(),
                    text,
                });
            }
            Err(e) => {
                output.write_all(format!("error: {e}\n").as_bytes()).await?;
                session = session.update(SessionEvent::Failed(e.to_string()));
            }
        }
    }

    output.flush().await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatTurn;
    use std::io::Write;
    use wiremock::{
        matchers::{method, path, path_regex},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mock_server(chat_status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chatPdfSourceId": "src_1",
                "yourSourceId": "1700000000000-abc123"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/chats/history/.+$"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "chatHistory": [] })),
            )
            .mount(&server)
            .await;
        let chat = if chat_status == 200 {
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "It is about cats." }))
        } else {
            ResponseTemplate::new(chat_status)
                .set_body_json(serde_json::json!({ "error": "Failed to perform chat with ChatPDF." }))
        };
        Mock::given(method("POST"))
            .and(path("/chats"))
            .respond_with(chat)
            .mount(&server)
            .await;
        server
    }

    fn pdf_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 fake").unwrap();
        file
    }

    #[tokio::test]
    async fn answers_each_line_and_records_transcript() {
        let server = mock_server(200).await;
        let client = AskPdfClient::new(&server.uri()).unwrap();
        let file = pdf_file();

        let input = "What is this document about?\n\n/quit\nignored\n";
        let mut output = Vec::new();
        let session = run_terminal(&client, file.path(), input.as_bytes(), &mut output)
            .await
            .unwrap();

        assert_eq!(session.source_id(), Some("src_1"));
        assert_eq!(
            session.transcript,
            vec![
                ChatTurn::user("What is this document about?"),
                ChatTurn::assistant("It is about cats.")
            ]
        );
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("/pdf/1700000000000-abc123"));
        assert!(printed.contains("It is about cats."));
    }

    #[tokio::test]
    async fn chat_failure_keeps_transcript_and_continues() {
        let server = mock_server(500).await;
        let client = AskPdfClient::new(&server.uri()).unwrap();
        let file = pdf_file();

        let mut output = Vec::new();
        let session = run_terminal(&client, file.path(), "first\nsecond\n".as_bytes(), &mut output)
            .await
            .unwrap();

        assert!(session.transcript.is_empty());
        assert!(session.last_error.is_some());
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("error:").count(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let server = MockServer::start().await;
        let client = AskPdfClient::new(&server.uri()).unwrap();
        let result = run_terminal(
            &client,
            Path::new("/definitely/not/here.pdf"),
            "".as_bytes(),
            Vec::new(),
        )
        .await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
