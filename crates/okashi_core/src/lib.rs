//! Okashi core: pure state machine, query builder and published result list.
mod effect;
mod list;
mod msg;
mod query;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use list::{ChannelListObserver, ListEvent, ListObserver, ResultList};
pub use msg::Msg;
pub use query::{build_search_url, QueryError, SearchConfig};
pub use record::{RecordImage, SnackRecord};
pub use state::{AppState, SearchId, SearchOutcome, UploadId, UploadStatus};
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView};
