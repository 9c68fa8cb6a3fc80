use super::super::intake::{excel_serial_to_datetime, RawCell};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::DateTime(value) => Some(value.date()),
        RawCell::Number(serial) => excel_serial_to_datetime(*serial).map(|dt| dt.date()),
        RawCell::Text(value) => parse_date_text(value),
        RawCell::Empty | RawCell::Bool(_) => None,
    }
}

fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
}

/// Hours cell as a non-negative number; `None` when the cell had to be filled.
pub(crate) fn parse_hours(cell: &RawCell) -> Option<f64> {
    let value = match cell {
        RawCell::Number(value) => Some(*value),
        RawCell::Text(value) => value.trim().parse::<f64>().ok(),
        RawCell::Empty | RawCell::Bool(_) | RawCell::DateTime(_) => None,
    }?;

    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawCell {
        RawCell::Text(value.to_string())
    }

    #[test]
    fn parse_date_supports_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_date(&text("2024-01-01")), Some(expected));
        assert_eq!(parse_date(&text("2024/01/01")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-01 09:30:00")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-01T09:30:00Z")), Some(expected));
        assert_eq!(parse_date(&RawCell::Number(45292.0)), Some(expected));
        assert_eq!(
            parse_date(&RawCell::DateTime(expected.and_hms_opt(8, 0, 0).unwrap())),
            Some(expected)
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date(&text("not-a-date")), None);
        assert_eq!(parse_date(&text("2024-13-45")), None);
        assert_eq!(parse_date(&text("  ")), None);
        assert_eq!(parse_date(&RawCell::Empty), None);
    }

    #[test]
    fn parse_hours_is_lenient() {
        assert_eq!(parse_hours(&RawCell::Number(4.5)), Some(4.5));
        assert_eq!(parse_hours(&text(" 2 ")), Some(2.0));
        assert_eq!(parse_hours(&text("two")), None);
        assert_eq!(parse_hours(&text("-3")), None);
        assert_eq!(parse_hours(&RawCell::Number(f64::INFINITY)), None);
        assert_eq!(parse_hours(&RawCell::Empty), None);
    }
}
