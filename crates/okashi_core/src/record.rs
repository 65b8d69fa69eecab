use url::Url;
use uuid::Uuid;

/// Raw bytes of a successfully decoded image, plus the pixel size the
/// decoder reported. Records never carry bytes that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// A fully validated search result. Every field is required; candidates
/// missing any of them are dropped before this type is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnackRecord {
    /// Random identity, used by front-ends as a list-rendering key only.
    pub id: Uuid,
    pub name: String,
    /// Detail page for the snack.
    pub link: Url,
    pub image: RecordImage,
}

impl SnackRecord {
    /// Builds a record with a freshly generated id.
    pub fn new(name: impl Into<String>, link: Url, image: RecordImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            link,
            image,
        }
    }
}
