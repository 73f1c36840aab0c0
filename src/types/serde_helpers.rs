//! Serde helpers for the registry's date format.
//!
//! The registry exchanges calendar dates as `YYYY-MM-DD` strings.

use serde::{Deserialize, Deserializer, Serializer, de, ser};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Serialize/deserialize a [`Date`] as a `YYYY-MM-DD` string.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use time::macros::date;
/// use crpt_api_client::types::serde_helpers::iso_date;
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Entry {
///     #[serde(with = "iso_date")]
///     reg_date: time::Date,
/// }
///
/// let entry = Entry { reg_date: date!(2024 - 03 - 07) };
/// let json = serde_json::to_string(&entry).unwrap();
/// assert_eq!(json, r#"{"reg_date":"2024-03-07"}"#);
/// ```
pub mod iso_date {
    use super::*;

    /// Serialize a date as `YYYY-MM-DD`.
    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(ISO_DATE).map_err(ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    /// Deserialize a `YYYY-MM-DD` string into a date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, ISO_DATE).map_err(de::Error::custom)
    }
}

/// Like [`iso_date`], for optional dates.
///
/// Pair with `#[serde(default)]` so a missing field deserializes to `None`.
pub mod option_iso_date {
    use super::*;

    /// Serialize an optional date as `YYYY-MM-DD` or `null`.
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = date.format(ISO_DATE).map_err(ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional `YYYY-MM-DD` string. Empty strings become `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => Date::parse(s, ISO_DATE).map(Some).map_err(de::Error::custom),
        }
    }
}
