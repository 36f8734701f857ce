pub mod models;
pub mod remote;
pub mod traits;
pub mod validate;

pub use models::{ApiEnvelope, FetchResult, VideoPayload};
pub use remote::RemoteApiExtractor;
pub use traits::Extractor;
pub use validate::validate_source_url;
