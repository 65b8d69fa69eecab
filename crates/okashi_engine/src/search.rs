use std::sync::mpsc;

use image::GenericImageView;
use pipeline_logging::{pipeline_debug, pipeline_warn};
use uuid::Uuid;

use crate::decode::{decode_envelope, RawItem};
use crate::fetch::Fetcher;
use crate::types::{
    EngineEvent, EnrichedImage, EnrichedItem, SearchFailure, SearchId, SearchTally,
};

/// Receives engine events. Implementations forward them to the single
/// consumer context that owns the published list.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink that forwards every event over an mpsc channel.
pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs one complete search: fetch, decode, then serial enrichment.
///
/// Event order per invocation: `EnvelopeDecoded` (only after a successful
/// decode), zero or more `RecordReady` in wire order, then exactly one
/// `SearchFinished`. A whole-search failure emits only `SearchFinished`,
/// so consumers keep whatever list they had.
pub async fn run_search(
    fetcher: &dyn Fetcher,
    search_id: SearchId,
    url: &str,
    sink: &dyn EventSink,
) {
    let outcome = search_inner(fetcher, search_id, url, sink).await;
    if let Err(failure) = &outcome {
        pipeline_warn!("search {search_id} failed: {failure}");
    }
    sink.emit(EngineEvent::SearchFinished { search_id, outcome });
}

async fn search_inner(
    fetcher: &dyn Fetcher,
    search_id: SearchId,
    url: &str,
    sink: &dyn EventSink,
) -> Result<SearchTally, SearchFailure> {
    let body = fetcher.fetch(url).await.map_err(SearchFailure::Fetch)?;
    let envelope = decode_envelope(&body).map_err(SearchFailure::Decode)?;

    let items = envelope.items();
    sink.emit(EngineEvent::EnvelopeDecoded {
        search_id,
        item_count: items.len(),
    });

    let mut tally = SearchTally {
        total_items: items.len(),
        ..SearchTally::default()
    };
    // One item at a time, in wire order; a slow image delays the rest of
    // the list rather than reordering it.
    for (index, item) in items.iter().enumerate() {
        match enrich_item(fetcher, item).await {
            Some(enriched) => {
                tally.enriched += 1;
                sink.emit(EngineEvent::RecordReady {
                    search_id,
                    item: enriched,
                });
            }
            None => {
                tally.skipped += 1;
                pipeline_debug!("search {search_id}: item {index} skipped");
            }
        }
    }

    Ok(tally)
}

/// One candidate: name, link and image URL must all be present and the
/// image must fetch and decode, else the item is dropped without touching
/// its neighbours.
async fn enrich_item(fetcher: &dyn Fetcher, item: &RawItem) -> Option<EnrichedItem> {
    let name = item.name.as_deref()?;
    let link = item.url.as_deref().and_then(|raw| url::Url::parse(raw).ok())?;
    let image_url = item.image.as_deref()?;

    let bytes = match fetcher.fetch(image_url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            pipeline_debug!("image fetch failed for {image_url}: {}", err.kind);
            return None;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded,
        Err(err) => {
            pipeline_debug!("image decode failed for {image_url}: {err}");
            return None;
        }
    };

    Some(EnrichedItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        link,
        image: EnrichedImage {
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        },
    })
}
