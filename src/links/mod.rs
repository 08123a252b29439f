pub mod detector;
pub mod extractor;
pub mod formatter;
pub mod http;
pub mod resolver;
#[cfg(test)]
pub(crate) mod testing;
pub mod truncate;
pub mod types;

pub use formatter::MessageFormatter;
pub use http::{HttpFetch, ReqwestFetcher};
pub use resolver::TitleResolver;
pub use types::{LinkConfig, OutboundFrame, ReplyBatch};
