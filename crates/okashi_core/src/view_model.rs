use uuid::Uuid;

use crate::state::{SearchOutcome, UploadStatus};

/// Everything a front-end needs to render; image bytes stay in core state
/// and are reachable through `AppState::results` when actually drawing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub records: Vec<RecordRowView>,
    pub result_count: usize,
    pub last_search: Option<SearchOutcome>,
    pub upload: UploadStatus,
}

/// One row of the rendered result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: Uuid,
    pub name: String,
    pub link: String,
}
