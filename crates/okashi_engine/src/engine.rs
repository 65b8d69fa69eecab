use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::search::{run_search, ChannelEventSink, EventSink};
use crate::types::{EngineEvent, SearchId, UploadId};
use crate::upload::{ReqwestUploader, UploadSettings, Uploader};

/// Engine-wide configuration; both halves carry production defaults.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub upload: UploadSettings,
}

enum EngineCommand {
    Search {
        search_id: SearchId,
        url: String,
    },
    Upload {
        upload_id: UploadId,
        image_png: Vec<u8>,
    },
}

/// Handle to the engine worker thread.
///
/// Commands run strictly one at a time, so each search's clear/append
/// event run stays contiguous even when the user triggers another search
/// before the first finishes. Events come back through `try_recv` on the
/// caller's single context; nothing else mutates consumer state.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let fetcher = ReqwestFetcher::new(config.fetch);
        let uploader = ReqwestUploader::new(config.upload);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sink = ChannelEventSink::new(event_tx);
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(&fetcher, &uploader, command, &sink));
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn search(&self, search_id: SearchId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            search_id,
            url: url.into(),
        });
    }

    pub fn upload(&self, upload_id: UploadId, image_png: Vec<u8>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            upload_id,
            image_png,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    fetcher: &ReqwestFetcher,
    uploader: &ReqwestUploader,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Search { search_id, url } => {
            run_search(fetcher, search_id, &url, sink).await;
        }
        EngineCommand::Upload {
            upload_id,
            image_png,
        } => {
            let result = uploader.upload(&image_png).await;
            sink.emit(EngineEvent::UploadFinished { upload_id, result });
        }
    }
}
