use crate::record::SnackRecord;
use crate::state::{SearchId, SearchOutcome, UploadId};

/// Inputs to the state machine: user intents and engine completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a search keyword.
    KeywordSubmitted(String),
    /// The search response decoded; the list clears before any append.
    EnvelopeDecoded {
        search_id: SearchId,
        item_count: usize,
    },
    /// One enriched record is ready, in wire order.
    RecordReady {
        search_id: SearchId,
        record: SnackRecord,
    },
    /// The search ran to completion or failed as a whole.
    SearchFinished {
        search_id: SearchId,
        outcome: SearchOutcome,
    },
    /// User picked an image and asked for the upload.
    UploadSubmitted { image_png: Vec<u8> },
    /// The upload round-trip finished.
    UploadFinished {
        upload_id: UploadId,
        result: Result<String, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
