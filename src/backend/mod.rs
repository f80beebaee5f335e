pub mod api;
pub mod http;
pub mod types;

pub use api::{ApiError, MeetingBackend};
pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, HistoryEntry, MemorySnapshot, Ordered, Participant};
