//! Canonical line-item record produced by the receipt parsers.

use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One purchased product line, normalized across dialects.
///
/// `amount` is the final post-discount value and is never negative.
/// Parsers produce these without identity; the ledger store assigns ids on
/// insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
}

impl LineItem {
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_cent_amounts() {
        let item = LineItem::new(
            "Bread",
            Money::from_cents(2000),
            "Bakery",
            NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
        );
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Bread","amount":2000,"category":"Bakery","date":"2026-08-06"}"#
        );
        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
