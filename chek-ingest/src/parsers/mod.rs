//! Per-dialect extraction logic.

pub mod fiscal;
pub mod pos;

use quick_xml::events::BytesStart;

/// Read one attribute by name, unescaped. Unreadable attributes count as
/// absent; receipts are tolerated to be partially malformed.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}
