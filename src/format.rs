//! Display formatting for numbers, money, dates and deltas.
//!
//! Missing or non-finite values render as `-` everywhere.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

pub const MISSING: &str = "-";

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SHORT_FORMAT: &[FormatItem<'static>] = format_description!("[month]-[day]");
const LONG_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Date rendering styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// `MM-DD`
    Short,
    /// `YYYY-MM-DD`
    #[default]
    Medium,
    /// `October 1, 2024`
    Long,
}

/// Visual tone of a change value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Formatted change with its tone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub text: String,
    pub tone: Tone,
}

/// Format with thousands separators and a fixed number of decimals.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };
    let mut grouped = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        grouped.push('-');
    }
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(value) => format!("{}%", format_number(Some(value), decimals)),
        None => MISSING.to_string(),
    }
}

/// Korean won with 억/만 compaction.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };
    if value >= 100_000_000.0 {
        format!("{}억원", format_number(Some(value / 100_000_000.0), 1))
    } else if value >= 10_000.0 {
        format!("{}만원", format_number(Some(value / 10_000.0), 1))
    } else {
        format!("{}원", format_number(Some(value), 0))
    }
}

/// Parse `YYYY-MM-DD`, also accepting a full timestamp by its date prefix.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    let prefix = text.get(..10)?;
    Date::parse(prefix, DATE_FORMAT).ok()
}

/// Parse an RFC 3339 timestamp; naive timestamps are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(parsed) =
        OffsetDateTime::parse(text, &time::format_description::well_known::Rfc3339)
    {
        return Some(parsed);
    }
    const NAIVE: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let trimmed = text.split('.').next().unwrap_or(text).replace(' ', "T");
    if let Ok(parsed) = PrimitiveDateTime::parse(&trimmed, NAIVE) {
        return Some(parsed.assume_utc());
    }
    parse_date(text).map(|date| date.midnight().assume_utc())
}

pub fn format_date(text: Option<&str>, style: DateStyle) -> String {
    text.and_then(parse_date)
        .and_then(|date| format_parsed_date(date, style))
        .unwrap_or_else(|| MISSING.to_string())
}

fn format_parsed_date(date: Date, style: DateStyle) -> Option<String> {
    let format = match style {
        DateStyle::Short => SHORT_FORMAT,
        DateStyle::Medium => DATE_FORMAT,
        DateStyle::Long => LONG_FORMAT,
    };
    date.format(format).ok()
}

/// Relative age of `then`; a week or older falls back to the medium date.
pub fn format_time_ago(then: Option<&str>, now: OffsetDateTime) -> String {
    let Some(then) = then.and_then(parse_timestamp) else {
        return MISSING.to_string();
    };
    let elapsed = now - then;
    let minutes = elapsed.whole_minutes();
    let hours = elapsed.whole_hours();
    let days = elapsed.whole_days();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        format_parsed_date(then.date(), DateStyle::Medium).unwrap_or_else(|| MISSING.to_string())
    }
}

/// Arrow-prefixed absolute change with a tone for colouring.
pub fn format_change(value: Option<f64>, is_percent: bool) -> Change {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return Change {
            text: MISSING.to_string(),
            tone: Tone::Neutral,
        };
    };
    let (arrow, tone) = if value > 0.0 {
        ("↑ ", Tone::Positive)
    } else if value < 0.0 {
        ("↓ ", Tone::Negative)
    } else {
        ("", Tone::Neutral)
    };
    let magnitude = if is_percent {
        format_percent(Some(value.abs()), 1)
    } else {
        format_number(Some(value.abs()), 1)
    };
    Change {
        text: format!("{arrow}{magnitude}"),
        tone,
    }
}

/// Signed lift such as `+29.4%`.
pub fn format_lift(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(value) if value > 0.0 => format!("+{}", format_percent(Some(value), 1)),
        Some(value) => format_percent(Some(value), 1),
        None => MISSING.to_string(),
    }
}

/// Today's date in local time (UTC when the offset is unknown).
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// `YYYY-MM-DD` for a date.
pub fn iso_date(date: Date) -> String {
    format_parsed_date(date, DateStyle::Medium).unwrap_or_else(|| MISSING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn numbers_get_grouping_and_fixed_decimals() {
        assert_eq!(format_number(Some(1234567.0), 0), "1,234,567");
        assert_eq!(format_number(Some(999.0), 0), "999");
        assert_eq!(format_number(Some(-1234.5), 1), "-1,234.5");
        assert_eq!(format_number(Some(-0.01), 1), "0.0");
        assert_eq!(format_number(None, 0), "-");
        assert_eq!(format_number(Some(f64::NAN), 2), "-");
    }

    #[test]
    fn percent_and_currency() {
        assert_eq!(format_percent(Some(12.345), 1), "12.3%");
        assert_eq!(format_currency(Some(250_000_000.0)), "2.5억원");
        assert_eq!(format_currency(Some(85_000.0)), "8.5만원");
        assert_eq!(format_currency(Some(9_500.0)), "9,500원");
        assert_eq!(format_currency(None), "-");
    }

    #[test]
    fn dates_in_each_style() {
        let text = Some("2024-10-01T09:30:00");
        assert_eq!(format_date(text, DateStyle::Short), "10-01");
        assert_eq!(format_date(text, DateStyle::Medium), "2024-10-01");
        assert_eq!(format_date(text, DateStyle::Long), "October 1, 2024");
        assert_eq!(format_date(Some("soon"), DateStyle::Medium), "-");
        assert_eq!(format_date(None, DateStyle::Medium), "-");
    }

    #[test]
    fn time_ago_buckets() {
        let now = datetime!(2024-10-10 12:00 UTC);
        assert_eq!(format_time_ago(Some("2024-10-10T11:59:30Z"), now), "just now");
        assert_eq!(format_time_ago(Some("2024-10-10T11:15:00Z"), now), "45m ago");
        assert_eq!(format_time_ago(Some("2024-10-10T02:00:00"), now), "10h ago");
        assert_eq!(format_time_ago(Some("2024-10-07T12:00:00Z"), now), "3d ago");
        assert_eq!(format_time_ago(Some("2024-09-01T12:00:00Z"), now), "2024-09-01");
        assert_eq!(format_time_ago(Some("garbage"), now), "-");
    }

    #[test]
    fn change_carries_arrow_and_tone() {
        assert_eq!(
            format_change(Some(3.21), true),
            Change {
                text: "↑ 3.2%".into(),
                tone: Tone::Positive
            }
        );
        assert_eq!(format_change(Some(-1500.0), false).text, "↓ 1,500.0");
        assert_eq!(format_change(Some(0.0), false).tone, Tone::Neutral);
        assert_eq!(format_change(None, false).text, "-");
        assert_eq!(format_lift(Some(29.4)), "+29.4%");
    }
}
