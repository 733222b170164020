//! Form 22 field vocabulary and value formatting.
//!
//! The notice template contains a fixed set of `${key}` tokens. This module
//! owns that vocabulary ([`FormField`]), the always-complete value map
//! ([`FormFieldMap`]) and the helpers that turn raw tracking data and dates
//! into the strings printed on the form.

mod dates;
mod fields;
mod format;

pub use dates::{genitive_month, parse_input_date, FormDate};
pub use fields::{FormField, FormFieldMap};
pub use format::{
    format_currency, format_storage_date, format_storage_date_in, format_weight,
    join_paragraphs, paragraph,
};
