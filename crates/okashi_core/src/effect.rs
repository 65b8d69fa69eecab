use crate::state::{SearchId, UploadId};

/// IO requests produced by `update`; the front-end forwards these to the
/// engine unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the single GET for a search and run the enrichment pipeline.
    FetchSearch { search_id: SearchId, url: String },
    /// POST one base64-encoded image to the upload endpoint.
    PostUpload {
        upload_id: UploadId,
        image_png: Vec<u8>,
    },
}
