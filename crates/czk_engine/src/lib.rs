//! Converter engine: fetches and decodes the exchange-rate feed off the UI thread.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::EngineHandle;
pub use fetch::{ChannelProgressSink, FeedFetcher, FetchSettings, ProgressSink, ReqwestFetcher};
pub use types::{
    EngineEvent, FailureKind, FeedText, FetchError, FetchMetadata, FetchOutput, FetchProgress,
    RequestId,
};
