//! Schema detection and dispatch.
//!
//! The only structure inspected here is the root element's tag name; the
//! dialect parsers own everything below it.

use crate::error::ParseError;
use crate::parsers;
use chek_core::{CategoryRules, LineItem};
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;

/// The two supported receipt document shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// POS-terminal export, root tag `RQ`.
    Pos,
    /// Fiscal tax receipt, root tag `CHECK`.
    Fiscal,
}

impl Dialect {
    fn from_root(tag: &str) -> Result<Dialect, ParseError> {
        match tag {
            "RQ" => Ok(Dialect::Pos),
            "CHECK" => Ok(Dialect::Fiscal),
            other => Err(ParseError::UnknownDialect(other.to_string())),
        }
    }
}

/// Identify the dialect of a document from its root tag.
pub fn detect(bytes: &[u8]) -> Result<Dialect, ParseError> {
    match root_tag(bytes)? {
        Some(tag) => Dialect::from_root(&tag),
        None => Err(ParseError::Malformed("no root element".to_string())),
    }
}

/// Parse a receipt document of either dialect into canonical line items.
///
/// Unknown root tags yield an empty list, not an error; malformed XML is
/// [`ParseError::Malformed`], which callers surface as "no items found".
pub fn detect_and_parse(
    bytes: &[u8],
    today: NaiveDate,
    rules: &CategoryRules,
) -> Result<Vec<LineItem>, ParseError> {
    match detect(bytes) {
        Ok(Dialect::Pos) => parsers::pos::parse(bytes, today, rules),
        Ok(Dialect::Fiscal) => parsers::fiscal::parse(bytes, today, rules),
        Err(ParseError::UnknownDialect(root)) => {
            tracing::debug!(%root, "unknown receipt dialect, no items extracted");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

fn root_tag(bytes: &[u8]) -> Result<Option<String>, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    loop {
        match reader.read_event().map_err(ParseError::from)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(
                    String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                ));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
