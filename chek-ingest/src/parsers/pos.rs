//! POS-terminal dialect (`RQ` root).
//!
//! The document interleaves `P` item elements and `D` discount elements in
//! no guaranteed order, so discounts are correlated to items strictly by
//! the `NI` → `N` sequence-number key. Document order and adjacency are
//! never used: the sequence number is the only correlation key that stays
//! stable across vendors' emit orders.

use crate::error::ParseError;
use crate::parsers::attr;
use chek_core::{CategoryRules, LineItem, Money};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// A discount row awaiting correlation. Lives only inside a single parse.
struct DiscountRecord {
    target_ref: String,
    amount: Money,
}

/// An item row before discounts are applied.
struct Provisional {
    seq: Option<String>,
    name: String,
    amount: Money,
}

/// Parse an `RQ` document into canonical line items.
///
/// `today` is the ingestion date, substituted when the document timestamp
/// is missing or unreadable.
pub fn parse(
    bytes: &[u8],
    today: NaiveDate,
    rules: &CategoryRules,
) -> Result<Vec<LineItem>, ParseError> {
    let mut reader = Reader::from_reader(bytes);

    let mut items: Vec<Provisional> = Vec::new();
    let mut discounts: Vec<DiscountRecord> = Vec::new();
    let mut ts_text = String::new();
    let mut in_ts = false;

    loop {
        match reader.read_event().map_err(ParseError::from)? {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"P" => items.push(read_item(&e)),
                b"D" => read_discount(&e, &mut discounts),
                b"TS" => in_ts = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"P" => items.push(read_item(&e)),
                b"D" => read_discount(&e, &mut discounts),
                _ => {}
            },
            Event::End(e) => {
                if e.name().as_ref() == b"TS" {
                    in_ts = false;
                }
            }
            Event::Text(t) => {
                if in_ts {
                    ts_text.push_str(t.unescape().unwrap_or_default().trim());
                }
            }
            _ => {}
        }
    }

    let date = parse_compact_timestamp(&ts_text).unwrap_or_else(|| {
        if !ts_text.is_empty() {
            tracing::debug!(ts = %ts_text, "unreadable document timestamp, using ingestion date");
        }
        today
    });

    // Sequence number → position of the first item that carries it.
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        if let Some(seq) = &item.seq {
            index.entry(seq.clone()).or_insert(i);
        }
    }

    for discount in discounts {
        match index.get(&discount.target_ref) {
            Some(&i) => {
                items[i].amount = items[i].amount.saturating_sub(discount.amount);
            }
            None => {
                tracing::debug!(
                    target = %discount.target_ref,
                    "discount references an item this receipt does not carry, dropped"
                );
            }
        }
    }

    Ok(items
        .into_iter()
        .map(|item| {
            let category = rules.classify(&item.name).to_string();
            LineItem::new(item.name, item.amount, category, date)
        })
        .collect())
}

fn read_item(e: &BytesStart<'_>) -> Provisional {
    let name = attr(e, b"NM").unwrap_or_else(|| "Unknown".to_string());
    let raw = attr(e, b"SM")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);
    Provisional {
        seq: attr(e, b"N"),
        name,
        amount: Money::from_cents(raw.max(0)),
    }
}

fn read_discount(e: &BytesStart<'_>, out: &mut Vec<DiscountRecord>) {
    let Some(target_ref) = attr(e, b"NI") else {
        tracing::debug!("discount without a target sequence number, dropped");
        return;
    };
    let raw = attr(e, b"SM")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);
    out.push(DiscountRecord {
        target_ref,
        amount: Money::from_cents(raw.max(0)),
    });
}

fn parse_compact_timestamp(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y%m%d%H%M%S")
        .ok()
        .map(|dt| dt.date())
}
