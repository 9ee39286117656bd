use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use crate::error::AskPdfError;

const SUFFIX_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

const SUFFIX_LEN: usize = 6;

/// Server-generated handle for a stored PDF: `<unix-millis>-<random suffix>`.
///
/// Unrelated to the provider's identifier space. Parsing only accepts
/// digits, a single dash and lowercase alphanumerics, so a valid id can
/// always be joined onto the upload directory safely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalId(String);

impl LocalId {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = nanoid!(SUFFIX_LEN, &SUFFIX_ALPHABET);
        Self(format!("{millis}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for this document inside the upload directory.
    pub fn file_name(&self) -> String {
        format!("{}-document.pdf", self.0)
    }
}

impl FromStr for LocalId {
    type Err = AskPdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AskPdfError::Validation(format!("Invalid document id: {s}"));

        let (millis, suffix) = s.split_once('-').ok_or_else(invalid)?;
        let millis_ok = !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit());
        let suffix_ok = !suffix.is_empty()
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase());

        if millis_ok && suffix_ok {
            Ok(Self(s.to_string()))
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for LocalId {
    type Error = AskPdfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocalId> for String {
    fn from(id: LocalId) -> Self {
        id.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A PDF persisted on local disk. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub local_id: LocalId,
    pub file_path: PathBuf,
}

/// Opaque source handle issued by the document QA provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSource {
    pub provider_id: String,
}

impl ProviderSource {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
        }
    }
}

/// Result of a successful upload: the local copy paired with its provider source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub document: StoredDocument,
    pub source: ProviderSource,
}
