use serde::Deserialize;

/// Top-level search response: one optional array of raw items. Unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchEnvelope {
    pub item: Option<Vec<RawItem>>,
}

impl SearchEnvelope {
    /// Items in wire order; an absent array reads as zero results.
    pub fn items(&self) -> &[RawItem] {
        self.item.as_deref().unwrap_or_default()
    }
}

/// One wire-format result before validation. Each field may be absent or
/// null independently of the others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawItem {
    pub name: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed search response: {message}")]
    Malformed { message: String },
}

/// Parses the response body as the search envelope.
pub fn decode_envelope(bytes: &[u8]) -> Result<SearchEnvelope, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed {
        message: err.to_string(),
    })
}
