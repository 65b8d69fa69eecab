//! Okashi engine: IO pipeline and effect execution.
mod decode;
mod engine;
mod fetch;
mod search;
mod types;
mod upload;

pub use decode::{decode_envelope, DecodeError, RawItem, SearchEnvelope};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use search::{run_search, ChannelEventSink, EventSink};
pub use types::{
    EngineEvent, EnrichedImage, EnrichedItem, FailureKind, FetchError, SearchFailure, SearchId,
    SearchTally, UploadId,
};
pub use upload::{ReqwestUploader, UploadError, UploadSettings, Uploader};
