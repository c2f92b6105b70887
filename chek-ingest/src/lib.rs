//! chek-ingest: receipt document ingestion. Dialect detection, the two
//! vendor XML parsers, and the byte-source fetcher.

pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod parsers;

pub use dispatch::{Dialect, detect, detect_and_parse};
pub use error::{FetchError, ParseError};
pub use fetch::{Source, fetch};
