//! Display formatting shared by view models.

use chrono::{DateTime, NaiveDate, Utc};

use tradepost_core::Money;

/// `Mar 5, 2026`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Mar 5, 2026 14:07` in UTC.
#[must_use]
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

/// `-` when absent.
#[must_use]
pub fn format_optional_datetime(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), format_datetime)
}

/// `$1,234.50`
#[must_use]
pub fn format_money(amount: Money) -> String {
    let text = amount.to_string();
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (whole, cents) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn dates() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).expect("date");
        assert_eq!(format_date(date), "Mar 5, 2026");

        let at = Utc.with_ymd_and_hms(2026, 11, 20, 9, 4, 0).single().expect("datetime");
        assert_eq!(format_datetime(at), "Nov 20, 2026 09:04");
        assert_eq!(format_optional_datetime(None), "-");
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(Money::from_cents(123_450)), "$1,234.50");
        assert_eq!(format_money(Money::from_cents(9_900)), "$99.00");
        assert_eq!(format_money(Money::from_cents(-100_000_000)), "-$1,000,000.00");
        assert_eq!(format_money(Money::ZERO), "$0.00");
    }
}
