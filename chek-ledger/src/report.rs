//! Period → date-range translation for spending reports.

use crate::store::{LedgerStore, StoreError};
use chek_core::Money;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

/// A reporting window, resolved against "today" at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    /// The last 7 calendar days, today included.
    TrailingWeek,
    /// From the 1st of the current month through today.
    CurrentMonth,
    /// Inclusive on both ends.
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Period {
    /// The inclusive `[from, to]` range this period covers.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Period::Today => (today, today),
            Period::TrailingWeek => (
                today.checked_sub_days(Days::new(6)).unwrap_or(today),
                today,
            ),
            Period::CurrentMonth => (today.with_day(1).unwrap_or(today), today),
            Period::Custom { from, to } => (from, to),
        }
    }
}

/// Category totals for a period. Re-reads the store on every call; an empty
/// map means no items fell in range.
pub async fn spending_by_category(
    store: &LedgerStore,
    period: Period,
    today: NaiveDate,
) -> Result<BTreeMap<String, Money>, StoreError> {
    let (from, to) = period.date_range(today);
    store.aggregate(from, to).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chek_core::LineItem;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_today_range() {
        let today = date("2026-08-06");
        assert_eq!(Period::Today.date_range(today), (today, today));
    }

    #[test]
    fn test_trailing_week_covers_seven_days() {
        let today = date("2026-08-06");
        let (from, to) = Period::TrailingWeek.date_range(today);
        assert_eq!(from, date("2026-07-31"));
        assert_eq!(to, today);
        assert_eq!((to - from).num_days() + 1, 7);
    }

    #[test]
    fn test_current_month_starts_on_the_first() {
        let today = date("2026-08-06");
        assert_eq!(
            Period::CurrentMonth.date_range(today),
            (date("2026-08-01"), today)
        );
    }

    #[test]
    fn test_custom_range_passes_through() {
        let today = date("2026-08-06");
        let period = Period::Custom {
            from: date("2026-01-01"),
            to: date("2026-06-30"),
        };
        assert_eq!(
            period.date_range(today),
            (date("2026-01-01"), date("2026-06-30"))
        );
    }

    #[tokio::test]
    async fn test_spending_by_category_filters_by_period() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .insert_check(&[
                LineItem::new("Bread", Money::from_cents(2000), "Bakery", date("2026-08-06")),
                LineItem::new("Water", Money::from_cents(1000), "Drinks", date("2026-08-01")),
                LineItem::new("Milk", Money::from_cents(2350), "Dairy", date("2026-07-02")),
            ])
            .await
            .unwrap();
        let today = date("2026-08-06");

        let day = spending_by_category(&store, Period::Today, today)
            .await
            .unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day["Bakery"], Money::from_cents(2000));

        let month = spending_by_category(&store, Period::CurrentMonth, today)
            .await
            .unwrap();
        assert_eq!(month.len(), 2);
        assert!(!month.contains_key("Dairy"));
    }

    #[tokio::test]
    async fn test_empty_period_is_empty_map_not_error() {
        let store = LedgerStore::open_in_memory().unwrap();
        let totals = spending_by_category(
            &store,
            Period::Custom {
                from: date("2000-01-01"),
                to: date("2000-12-31"),
            },
            date("2026-08-06"),
        )
        .await
        .unwrap();
        assert!(totals.is_empty());
    }
}
