use jiff::tz::TimeZone;
use jiff::Timestamp;
use pneumo_core::error::CoreError;
use pneumo_core::format::{
    display_decimal, fixed_half_up, format_timestamp, parse_decimal, parse_required,
    round_half_up, to_fixed,
};

#[test]
fn to_fixed_pads_fraction() {
    assert_eq!(to_fixed(0.5, 2), "0.50");
    assert_eq!(to_fixed(3.0, 1), "3.0");
    assert_eq!(to_fixed(12.345, 0), "12");
}

#[test]
fn to_fixed_rounds_ties_to_even() {
    assert_eq!(to_fixed(0.125, 2), "0.12");
    assert_eq!(to_fixed(2.5, 0), "2");
    assert_eq!(to_fixed(3.5, 0), "4");
}

#[test]
fn half_up_rounds_ties_up() {
    assert_eq!(round_half_up(2.5, 0), 3.0);
    assert_eq!(round_half_up(-2.5, 0), -2.0);
    assert_eq!(fixed_half_up(12.25, 1), "12.3");
    assert_eq!(fixed_half_up(200.0, 0), "200");
}

#[test]
fn display_decimal_always_has_fraction() {
    assert_eq!(display_decimal(22.0), "22.0");
    assert_eq!(display_decimal(22.5), "22.5");
    assert_eq!(display_decimal(-1.25), "-1.25");
}

#[test]
fn fixed_then_parse_round_trips_within_tolerance() {
    let values = [0.0, 1.0, -1.645, 3.14159, 72.456, 0.0049, 123.995, -0.51];
    for decimals in 0..=3u32 {
        let tolerance = 10f64.powi(-(decimals as i32));
        for value in values {
            let text = to_fixed(value, decimals);
            let parsed = parse_decimal(&text).expect("formatted value parses");
            assert!(
                (parsed - value).abs() <= tolerance,
                "{value} at {decimals} decimals gave {text}"
            );
        }
    }
}

#[test]
fn parse_decimal_accepts_comma_and_whitespace() {
    assert_eq!(parse_decimal(" 1,5 "), Some(1.5));
    assert_eq!(parse_decimal("-2"), Some(-2.0));
    assert_eq!(parse_decimal("7."), Some(7.0));
}

#[test]
fn parse_decimal_rejects_garbage() {
    assert_eq!(parse_decimal(""), None);
    assert_eq!(parse_decimal("   "), None);
    assert_eq!(parse_decimal("abc"), None);
    assert_eq!(parse_decimal("1e3"), None);
    assert_eq!(parse_decimal("1.2.3"), None);
    assert_eq!(parse_decimal("-"), None);
    assert_eq!(parse_decimal("."), None);
}

#[test]
fn parse_required_distinguishes_missing_from_invalid() {
    assert!(matches!(
        parse_required("fev1", "  "),
        Err(CoreError::MissingField(field)) if field == "fev1"
    ));
    assert!(matches!(
        parse_required("fev1", "x1"),
        Err(CoreError::InvalidNumber(text)) if text == "x1"
    ));
    assert_eq!(parse_required("fev1", "-1,7").unwrap(), -1.7);
}

#[test]
fn timestamp_uses_day_month_year() {
    let ts: Timestamp = "2024-03-07T14:05:00Z".parse().unwrap();
    assert_eq!(format_timestamp(ts, &TimeZone::UTC), "07.03.2024 14:05");
}
