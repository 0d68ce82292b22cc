//! Calendar helpers for date-based business rules.

use chrono::NaiveDate;

/// All dates from `from` through `to`, inclusive. Empty when `from > to`.
pub fn date_range_inclusive(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = from;
    while current <= to {
        dates.push(current);
        current += chrono::Duration::days(1);
    }
    dates
}
