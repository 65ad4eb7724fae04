//! Display helpers for dates and yen amounts.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The date format used for transaction dates, e.g. `2024-05-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `2024-05`
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// `2024年05月`
pub fn format_jp_month(date: NaiveDate) -> String {
    date.format("%Y年%m月").to_string()
}

/// `2024`
pub fn format_year(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}

/// `2024年`
pub fn format_jp_year(date: NaiveDate) -> String {
    date.format("%Y年").to_string()
}

/// The two-digit month of year, e.g. `05`. This is the legacy monthly grouping key.
pub fn return_month(date: NaiveDate) -> String {
    format!("{:02}", date.month())
}

/// Converts a `yyyy-MM-dd` string into `yyyy年MM月dd日`.
///
/// An empty input gives an empty output and an unparseable input is returned unchanged, so this
/// is safe to call on whatever a caller happens to hold.
pub fn format_jp_day(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => d.format("%Y年%m月%d日").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Formats a yen value with ja-JP thousands separators: `1000` -> `1,000`.
///
/// Whole values are written without fraction digits, others with two.
pub fn format_currency(value: Decimal) -> String {
    let f = value.to_f64().unwrap_or_default();
    if value.fract().is_zero() {
        format_num::format_num!(",.0", f)
    } else {
        format_num::format_num!(",.2", f)
    }
}

/// Converts full-width ASCII variants (U+FF01 to U+FF5E) to their half-width forms, the ideographic
/// space to a plain space, and the long vowel mark `ー` to `-`.
///
/// Input typed with a Japanese IME often arrives this way: `１，０００` -> `1,000`.
pub fn to_half_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            'ー' => '-',
            _ => c,
        })
        .collect()
}
