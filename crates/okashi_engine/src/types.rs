use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::decode::DecodeError;
use crate::upload::UploadError;

pub type SearchId = u64;
pub type UploadId = u64;

/// Image payload of an enriched item: the raw bytes plus the size the
/// decoder reported while validating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// One wire item that survived enrichment: all fields present, image
/// fetched and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedItem {
    /// Fresh random identity, generated at enrichment time.
    pub id: Uuid,
    pub name: String,
    pub link: Url,
    pub image: EnrichedImage,
}

/// Everything the engine reports back to the single consumer context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The envelope decoded; consumers clear their list before any append.
    EnvelopeDecoded {
        search_id: SearchId,
        item_count: usize,
    },
    /// One record survived enrichment, emitted in wire order.
    RecordReady {
        search_id: SearchId,
        item: EnrichedItem,
    },
    /// The search is over. `Err` means the whole search failed and nothing
    /// was emitted for it.
    SearchFinished {
        search_id: SearchId,
        outcome: Result<SearchTally, SearchFailure>,
    },
    /// The upload round-trip finished.
    UploadFinished {
        upload_id: UploadId,
        result: Result<String, UploadError>,
    },
}

/// Per-search item accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchTally {
    pub total_items: usize,
    pub enriched: usize,
    pub skipped: usize,
}

/// Whole-search failures. Per-item problems are skips, never failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    Fetch(FetchError),
    Decode(DecodeError),
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::Fetch(err) => write!(f, "fetch failed: {} ({})", err.kind, err.message),
            SearchFailure::Decode(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
