mod chat;
mod upload;

pub use chat::{ChatService, EMPTY_QUERY, EMPTY_SOURCE_ID};
pub use upload::UploadPipeline;
