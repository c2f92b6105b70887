//! Fiscal tax-receipt dialect (`CHECK` root).
//!
//! A flat list of `ROW` elements with `NAME`/`COST` children, costs in
//! decimal major units, and one `ORDERDATE` element (`DDMMYYYY`). No
//! discount concept exists in this dialect.

use crate::error::ParseError;
use chek_core::{CategoryRules, LineItem, Money};
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Default)]
struct RowAcc {
    name: Option<String>,
    cost: Option<String>,
}

enum Field {
    None,
    Name,
    Cost,
    OrderDate,
}

/// Parse a `CHECK` document into canonical line items.
///
/// `today` is the ingestion date, substituted when `ORDERDATE` is missing
/// or unreadable.
pub fn parse(
    bytes: &[u8],
    today: NaiveDate,
    rules: &CategoryRules,
) -> Result<Vec<LineItem>, ParseError> {
    let mut reader = Reader::from_reader(bytes);

    let mut rows: Vec<RowAcc> = Vec::new();
    let mut current: Option<RowAcc> = None;
    let mut field = Field::None;
    let mut date_text = String::new();

    loop {
        match reader.read_event().map_err(ParseError::from)? {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"ROW" => current = Some(RowAcc::default()),
                b"NAME" if current.is_some() => field = Field::Name,
                b"COST" if current.is_some() => field = Field::Cost,
                b"ORDERDATE" => field = Field::OrderDate,
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"ROW" {
                    rows.push(RowAcc::default());
                }
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap_or_default();
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                match field {
                    Field::Name => {
                        if let Some(row) = current.as_mut() {
                            row.name = Some(text.to_string());
                        }
                    }
                    Field::Cost => {
                        if let Some(row) = current.as_mut() {
                            row.cost = Some(text.to_string());
                        }
                    }
                    Field::OrderDate => date_text.push_str(text),
                    Field::None => {}
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"ROW" => {
                    if let Some(row) = current.take() {
                        rows.push(row);
                    }
                }
                b"NAME" | b"COST" | b"ORDERDATE" => field = Field::None,
                _ => {}
            },
            _ => {}
        }
    }

    let date = NaiveDate::parse_from_str(date_text.trim(), "%d%m%Y").unwrap_or_else(|_| {
        if !date_text.is_empty() {
            tracing::debug!(date = %date_text, "unreadable order date, using ingestion date");
        }
        today
    });

    Ok(rows
        .into_iter()
        .map(|row| {
            let name = row.name.unwrap_or_else(|| "Unknown".to_string());
            let amount = row
                .cost
                .and_then(|cost| Money::parse_decimal(&cost).ok())
                .unwrap_or(Money::ZERO);
            let category = rules.classify(&name).to_string();
            LineItem::new(name, amount, category, date)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn parse_doc(xml: &str) -> Vec<LineItem> {
        parse(xml.as_bytes(), today(), &CategoryRules::default()).unwrap()
    }

    #[test]
    fn test_row_becomes_line_item_in_cents() {
        let items = parse_doc(
            r#"<CHECK>
                <ORDERDATE>31012026</ORDERDATE>
                <CHECKBODY>
                    <ROW><NAME>Milk</NAME><COST>23.50</COST></ROW>
                </CHECKBODY>
            </CHECK>"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Milk");
        assert_eq!(items[0].amount, Money::from_cents(2350));
        assert_eq!(items[0].category, "Dairy");
        assert_eq!(items[0].date, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
    }

    #[test]
    fn test_multiple_rows_keep_order() {
        let items = parse_doc(
            r#"<CHECK><CHECKBODY>
                <ROW><NAME>Bread</NAME><COST>18.00</COST></ROW>
                <ROW><NAME>Water</NAME><COST>9.25</COST></ROW>
            </CHECKBODY></CHECK>"#,
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Bread");
        assert_eq!(items[1].amount, Money::from_cents(925));
    }

    #[test]
    fn test_unparseable_cost_is_zero() {
        let items = parse_doc(
            r#"<CHECK><CHECKBODY>
                <ROW><NAME>Milk</NAME><COST>free?</COST></ROW>
                <ROW><NAME>Bread</NAME></ROW>
            </CHECKBODY></CHECK>"#,
        );
        assert_eq!(items[0].amount, Money::ZERO);
        assert_eq!(items[1].amount, Money::ZERO);
    }

    #[test]
    fn test_bad_order_date_falls_back_to_ingestion_date() {
        let items = parse_doc(
            r#"<CHECK>
                <ORDERDATE>2026-01-31</ORDERDATE>
                <CHECKBODY><ROW><NAME>Milk</NAME><COST>1.00</COST></ROW></CHECKBODY>
            </CHECK>"#,
        );
        assert_eq!(items[0].date, today());
    }

    #[test]
    fn test_missing_name_defaults() {
        let items = parse_doc(
            r#"<CHECK><CHECKBODY><ROW><COST>5.00</COST></ROW></CHECKBODY></CHECK>"#,
        );
        assert_eq!(items[0].name, "Unknown");
        assert_eq!(items[0].category, "Other");
    }
}
