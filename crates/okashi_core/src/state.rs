use crate::list::{ListObserver, ResultList};
use crate::query::SearchConfig;
use crate::view_model::{AppViewModel, RecordRowView};

pub type SearchId = u64;
pub type UploadId = u64;

/// Terminal status of a search, kept for the view only. A failed search
/// never touches the record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed { enriched: usize, skipped: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    /// Request in flight; front-ends show their "please wait" surface.
    Waiting,
    Done { response: String },
    Failed { message: String },
}

/// All mutable application state. Mutated only through `update`, from a
/// single context.
#[derive(Debug, Default)]
pub struct AppState {
    config: SearchConfig,
    results: ResultList,
    next_search_id: SearchId,
    next_upload_id: UploadId,
    last_search: Option<(SearchId, SearchOutcome)>,
    upload: UploadStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with a non-default search config; tests point the endpoint at
    /// a mock server this way.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    /// Registers an observer for every future clear/append notification.
    pub fn attach_observer(&mut self, observer: Box<dyn ListObserver>) {
        self.results.attach(observer);
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            records: self
                .results
                .records()
                .iter()
                .map(|record| RecordRowView {
                    id: record.id,
                    name: record.name.clone(),
                    link: record.link.to_string(),
                })
                .collect(),
            result_count: self.results.len(),
            last_search: self.last_search.as_ref().map(|(_, outcome)| outcome.clone()),
            upload: self.upload.clone(),
        }
    }

    pub(crate) fn allocate_search_id(&mut self) -> SearchId {
        self.next_search_id += 1;
        self.next_search_id
    }

    pub(crate) fn allocate_upload_id(&mut self) -> UploadId {
        self.next_upload_id += 1;
        self.next_upload_id
    }

    pub(crate) fn results_mut(&mut self) -> &mut ResultList {
        &mut self.results
    }

    pub(crate) fn set_last_search(&mut self, search_id: SearchId, outcome: SearchOutcome) {
        self.last_search = Some((search_id, outcome));
    }

    pub(crate) fn set_upload_status(&mut self, status: UploadStatus) {
        self.upload = status;
    }
}
