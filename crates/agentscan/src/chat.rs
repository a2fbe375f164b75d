//! Streaming conversation support: the record decoder and the session that
//! drives a transcript through submit / stream / rollback.
pub mod decode;
pub mod session;

pub use decode::StreamDecoder;
pub use session::{ChatContext, ChatSession};
