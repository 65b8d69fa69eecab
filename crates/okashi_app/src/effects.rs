use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use okashi_core::{Effect, Msg, RecordImage, SearchOutcome, SnackRecord};
use okashi_engine::{EngineConfig, EngineEvent, EngineHandle, EnrichedItem};
use pipeline_logging::pipeline_info;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Self {
        let engine = EngineHandle::new(EngineConfig::default());
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSearch { search_id, url } => {
                    pipeline_info!("search {search_id}: {url}");
                    self.engine.search(search_id, url);
                }
                Effect::PostUpload {
                    upload_id,
                    image_png,
                } => {
                    pipeline_info!("upload {upload_id}: {} bytes", image_png.len());
                    self.engine.upload(upload_id, image_png);
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

/// Engine events and core messages are separate vocabularies; this is the
/// one place they meet.
fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::EnvelopeDecoded {
            search_id,
            item_count,
        } => Msg::EnvelopeDecoded {
            search_id,
            item_count,
        },
        EngineEvent::RecordReady { search_id, item } => Msg::RecordReady {
            search_id,
            record: map_record(item),
        },
        EngineEvent::SearchFinished { search_id, outcome } => Msg::SearchFinished {
            search_id,
            outcome: match outcome {
                Ok(tally) => SearchOutcome::Completed {
                    enriched: tally.enriched,
                    skipped: tally.skipped,
                },
                Err(failure) => SearchOutcome::Failed {
                    message: failure.to_string(),
                },
            },
        },
        EngineEvent::UploadFinished { upload_id, result } => Msg::UploadFinished {
            upload_id,
            result: result.map_err(|err| err.to_string()),
        },
    }
}

fn map_record(item: EnrichedItem) -> SnackRecord {
    SnackRecord {
        id: item.id,
        name: item.name,
        link: item.link,
        image: RecordImage {
            bytes: item.image.bytes,
            width: item.image.width,
            height: item.image.height,
        },
    }
}
