//! Calendar dates printed on the notice.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use super::fields::{FormField, FormFieldMap};

/// Input format for user supplied dates.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A date slot on the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormDate {
    /// Date the notice was generated, printed as "5 марта 2021".
    Generation,
    /// Issue date of the recipient's identity document.
    IdIssue,
    /// Date the parcel is handed over; the year is printed with two digits.
    Pickup,
}

impl FormDate {
    /// The form fields this date fills.
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            FormDate::Generation => &[FormField::GenerationDate],
            FormDate::IdIssue => &[
                FormField::IdIssueDay,
                FormField::IdIssueMonth,
                FormField::IdIssueYear,
            ],
            FormDate::Pickup => &[
                FormField::PickupDay,
                FormField::PickupMonth,
                FormField::PickupYear,
            ],
        }
    }

    /// Write `date` into the fields of this slot.
    pub fn apply(&self, date: NaiveDate, map: &mut FormFieldMap) {
        let month = genitive_month(date.month());
        match self {
            FormDate::Generation => {
                map.set(
                    FormField::GenerationDate,
                    format!("{} {} {}", date.day(), month, date.year()),
                );
            }
            FormDate::IdIssue => {
                map.set(FormField::IdIssueDay, date.day().to_string());
                map.set(FormField::IdIssueMonth, month);
                map.set(FormField::IdIssueYear, date.year().to_string());
            }
            FormDate::Pickup => {
                map.set(FormField::PickupDay, date.day().to_string());
                map.set(FormField::PickupMonth, month);
                map.set(FormField::PickupYear, (date.year() - 2000).to_string());
            }
        }
    }

    /// Parse `value` and apply it, falling back to `fallback` when the
    /// value is missing or malformed.
    pub fn apply_or(&self, value: Option<&str>, fallback: NaiveDate, map: &mut FormFieldMap) {
        let date = value
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| {
                let parsed = parse_input_date(v);
                if parsed.is_none() {
                    warn!(date = v, slot = ?self, "Unrecognised date, using fallback");
                }
                parsed
            })
            .unwrap_or(fallback);
        self.apply(date, map);
    }
}

/// Parse an ISO 8601 calendar date (`yyyy-mm-dd`).
pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT).ok()
}

/// Russian month name in the genitive case (1 = January).
pub fn genitive_month(month: u32) -> &'static str {
    match month {
        1 => "января",
        2 => "февраля",
        3 => "марта",
        4 => "апреля",
        5 => "мая",
        6 => "июня",
        7 => "июля",
        8 => "августа",
        9 => "сентября",
        10 => "октября",
        11 => "ноября",
        12 => "декабря",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generation_date() {
        let mut map = FormFieldMap::template();
        FormDate::Generation.apply(date(2021, 3, 5), &mut map);
        assert_eq!(map.get(FormField::GenerationDate), "5 марта 2021");
    }

    #[test]
    fn test_id_issue_date() {
        let mut map = FormFieldMap::template();
        FormDate::IdIssue.apply(date(2015, 12, 31), &mut map);
        assert_eq!(map.get(FormField::IdIssueDay), "31");
        assert_eq!(map.get(FormField::IdIssueMonth), "декабря");
        assert_eq!(map.get(FormField::IdIssueYear), "2015");
    }

    #[test]
    fn test_pickup_year_has_two_digits() {
        let mut map = FormFieldMap::template();
        FormDate::Pickup.apply(date(2024, 1, 9), &mut map);
        assert_eq!(map.get(FormField::PickupDay), "9");
        assert_eq!(map.get(FormField::PickupMonth), "января");
        assert_eq!(map.get(FormField::PickupYear), "24");
    }

    #[test]
    fn test_apply_or_falls_back_on_bad_input() {
        let mut map = FormFieldMap::template();
        FormDate::IdIssue.apply_or(Some("31/12/2015"), date(2000, 6, 1), &mut map);
        assert_eq!(map.get(FormField::IdIssueYear), "2000");

        FormDate::IdIssue.apply_or(Some("2010-02-03"), date(2000, 6, 1), &mut map);
        assert_eq!(map.get(FormField::IdIssueDay), "3");
        assert_eq!(map.get(FormField::IdIssueMonth), "февраля");

        FormDate::IdIssue.apply_or(None, date(2000, 6, 1), &mut map);
        assert_eq!(map.get(FormField::IdIssueMonth), "июня");
    }

    #[test]
    fn test_fields_cover_written_values() {
        for slot in [FormDate::Generation, FormDate::IdIssue, FormDate::Pickup] {
            let mut map = FormFieldMap::with_fields(&[]);
            slot.apply(date(2022, 7, 14), &mut map);
            assert_eq!(map.len(), slot.fields().len());
            for field in slot.fields() {
                assert!(!map.get(*field).is_empty());
            }
        }
    }

    #[test]
    fn test_genitive_month_out_of_range() {
        assert_eq!(genitive_month(0), "");
        assert_eq!(genitive_month(13), "");
    }
}
