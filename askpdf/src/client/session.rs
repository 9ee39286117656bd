use crate::models::ChatTurn;

/// The pairing produced by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDocument {
    pub local_id: String,
    pub source_id: String,
    pub pdf_url: String,
}

/// Everything a client remembers between calls. Lives for one session only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub document: Option<SessionDocument>,
    pub transcript: Vec<ChatTurn>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Uploaded(SessionDocument),
    Answered { query: String, text: String },
    HistoryLoaded(Vec<ChatTurn>),
    Failed(String),
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider source id to chat against, once a document is uploaded.
    pub fn source_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.source_id.as_str())
    }

    pub fn update(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::Uploaded(document) => {
                self.document = Some(document);
                self.transcript.clear();
                self.last_error = None;
            }
            SessionEvent::Answered { query, text } => {
                self.transcript.push(ChatTurn::user(query));
                self.transcript.push(ChatTurn::assistant(text));
                self.last_error = None;
            }
            // An empty history says nothing new; keep what is on screen.
            SessionEvent::HistoryLoaded(turns) => {
                if !turns.is_empty() {
                    self.transcript = turns;
                }
            }
            SessionEvent::Failed(message) => {
                self.last_error = Some(message);
            }
        }
        self
    }
}
