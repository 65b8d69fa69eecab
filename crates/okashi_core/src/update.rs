use log::{debug, warn};

use crate::query::build_search_url;
use crate::state::{AppState, UploadStatus};
use crate::{Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Engine completions are applied regardless of which search they belong
/// to; overlapping searches are neither deduplicated nor cancelled, so a
/// later search's clear simply wipes whatever an earlier one appended.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::KeywordSubmitted(keyword) => match build_search_url(state.config(), &keyword) {
            Ok(url) => {
                let search_id = state.allocate_search_id();
                debug!("search {search_id}: {url}");
                vec![Effect::FetchSearch {
                    search_id,
                    url: url.to_string(),
                }]
            }
            Err(err) => {
                // Aborts before any network call; the list is not touched.
                warn!("search aborted, query build failed: {err}");
                Vec::new()
            }
        },
        Msg::EnvelopeDecoded {
            search_id,
            item_count,
        } => {
            debug!("search {search_id}: envelope decoded, {item_count} items");
            state.results_mut().begin();
            Vec::new()
        }
        Msg::RecordReady { search_id: _, record } => {
            state.results_mut().push(record);
            Vec::new()
        }
        Msg::SearchFinished { search_id, outcome } => {
            state.set_last_search(search_id, outcome);
            Vec::new()
        }
        Msg::UploadSubmitted { image_png } => {
            let upload_id = state.allocate_upload_id();
            state.set_upload_status(UploadStatus::Waiting);
            vec![Effect::PostUpload {
                upload_id,
                image_png,
            }]
        }
        Msg::UploadFinished {
            upload_id: _,
            result,
        } => {
            let status = match result {
                Ok(response) => UploadStatus::Done { response },
                Err(message) => UploadStatus::Failed { message },
            };
            state.set_upload_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
