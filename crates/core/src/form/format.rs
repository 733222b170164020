//! Formatting of tracking data into printable form values.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

/// Format a parcel weight given in grams.
///
/// Zero yields an empty string, whole kilograms are printed without grams.
pub fn format_weight(grams: i64) -> String {
    if grams == 0 {
        String::new()
    } else if grams > 0 && grams % 1000 == 0 {
        format!("{} кг", grams / 1000)
    } else {
        format!("{} кг {} г", grams / 1000, grams % 1000)
    }
}

/// Format a rouble amount, adding kopecks only when they are non-zero.
///
/// Kopecks are rounded half-up on the shortest decimal form of `amount`, so
/// `1.005` prints as 1 rouble 01 kopeck rather than following its binary value.
pub fn format_currency(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return String::new();
    }

    let (roubles, kopecks) = round_to_kopecks(amount.abs());
    let sign = if amount < 0.0 { "-" } else { "" };

    let mut result = format!("{}{} руб.", sign, roubles);
    if kopecks != "00" {
        result.push_str(&format!(" {} коп.", kopecks));
    }
    result
}

/// Split a non-negative amount into whole roubles and two kopeck digits.
fn round_to_kopecks(amount: f64) -> (String, String) {
    // `Display` for f64 never uses exponent notation.
    let repr = amount.to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let round_up = fraction.as_bytes().get(2).is_some_and(|d| *d >= b'5');

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(2))
        .collect();

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let kopecks = digits.split_off(digits.len() - 2);
    let as_text = |d: &[u8]| d.iter().map(|&b| b as char).collect::<String>();
    (as_text(&digits), as_text(&kopecks))
}

/// Format a storage deadline (epoch millis) as `dd.mm.yyyy` in local time.
pub fn format_storage_date(epoch_millis: i64) -> String {
    format_storage_date_in(epoch_millis, &Local)
}

/// Format a storage deadline (epoch millis) as `dd.mm.yyyy` in `tz`.
pub fn format_storage_date_in<Tz>(epoch_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if epoch_millis == 0 {
        return String::new();
    }

    match DateTime::from_timestamp_millis(epoch_millis) {
        Some(utc) => utc.with_timezone(tz).format("%d.%m.%Y").to_string(),
        None => String::new(),
    }
}

/// Wrap text into an ODF paragraph.
pub fn paragraph(text: &str) -> String {
    format!("<text:p>{}</text:p>", text)
}

/// Wrap every line into its own paragraph and concatenate them.
pub fn join_paragraphs<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| paragraph(line.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(0), "");
        assert_eq!(format_weight(1000), "1 кг");
        assert_eq!(format_weight(1500), "1 кг 500 г");
        assert_eq!(format_weight(250), "0 кг 250 г");
        assert_eq!(format_weight(12000), "12 кг");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "");
        assert_eq!(format_currency(150.0), "150 руб.");
        assert_eq!(format_currency(150.5), "150 руб. 50 коп.");
        assert_eq!(format_currency(10.05), "10 руб. 05 коп.");
        assert_eq!(format_currency(f64::NAN), "");
    }

    #[test]
    fn test_format_currency_rounds_half_up() {
        assert_eq!(format_currency(0.125), "0 руб. 13 коп.");
        assert_eq!(format_currency(1.005), "1 руб. 01 коп.");
        assert_eq!(format_currency(2.675), "2 руб. 68 коп.");
        assert_eq!(format_currency(0.124), "0 руб. 12 коп.");
        assert_eq!(format_currency(99.9), "99 руб. 90 коп.");
    }

    #[test]
    fn test_format_currency_carries_into_roubles() {
        assert_eq!(format_currency(9.999), "10 руб.");
        assert_eq!(format_currency(0.995), "1 руб.");
        assert_eq!(format_currency(0.001), "0 руб.");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1.5), "-1 руб. 50 коп.");
        assert_eq!(format_currency(-0.125), "-0 руб. 13 коп.");
    }

    #[test]
    fn test_formatting_is_stable() {
        assert_eq!(format_currency(99.99), format_currency(99.99));
        assert_eq!(format_weight(1234), format_weight(1234));
    }

    #[test]
    fn test_format_storage_date() {
        assert_eq!(format_storage_date(0), "");
        assert_eq!(format_storage_date_in(0, &Utc), "");
        // 2021-03-15T12:00:00Z
        assert_eq!(format_storage_date_in(1_615_809_600_000, &Utc), "15.03.2021");
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(paragraph("x"), "<text:p>x</text:p>");
        assert_eq!(
            join_paragraphs(["a", "b"]),
            "<text:p>a</text:p><text:p>b</text:p>"
        );
        assert_eq!(join_paragraphs(Vec::<String>::new()), "");
    }
}
