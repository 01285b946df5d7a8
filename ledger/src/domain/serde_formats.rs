//! Serde helpers keeping the stored document in its established JSON shape.
//!
//! Amounts are plain JSON numbers (`500`, `12.5`) and timestamps are ISO-8601
//! strings, written with millisecond precision and a `Z` suffix
//! (`2024-05-01T09:30:00.000Z`). Writing a fetched document back must not
//! change either representation.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Decimal amounts serialised as JSON numbers.
pub mod decimal_number {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserializer, Serializer, ser::Error as _};

    /// Serialise whole amounts as integers and fractional ones as floats.
    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let normalized = value.normalize();
        if normalized.scale() == 0 {
            if let Some(whole) = normalized.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        let float = normalized
            .to_f64()
            .ok_or_else(|| S::Error::custom(format!("amount {value} is not representable")))?;
        serializer.serialize_f64(float)
    }

    /// Accept integer, float, or numeric string input.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::float::deserialize(deserializer)
    }
}

/// UTC instant as stored in the document.
///
/// Timestamps created here are written as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
/// Timestamps decoded from the store keep their original text, so records
/// seeded in another RFC 3339 form are written back unchanged. Equality
/// compares the instant only.
#[derive(Debug, Clone)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    stored: Option<String>,
}

impl Timestamp {
    /// Wrap an instant produced by this process.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            stored: None,
        }
    }

    /// The instant in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    fn text(&self) -> Cow<'_, str> {
        match &self.stored {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(self.instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl PartialEq<DateTime<Utc>> for Timestamp {
    fn eq(&self, other: &DateTime<Utc>) -> bool {
        self.instant == *other
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let instant = text
            .parse::<DateTime<Utc>>()
            .map_err(|error| D::Error::custom(format!("invalid timestamp '{text}': {error}")))?;
        Ok(Self {
            instant,
            stored: Some(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::Timestamp;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        #[serde(with = "super::decimal_number")]
        amount: Decimal,
        at: Timestamp,
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid time")
    }

    #[rstest]
    #[case::whole(Decimal::new(500, 0), json!(500))]
    #[case::trailing_zero_scale(Decimal::new(35000, 2), json!(350))]
    #[case::fractional(Decimal::new(125, 1), json!(12.5))]
    fn amounts_render_as_json_numbers(#[case] amount: Decimal, #[case] expected: serde_json::Value) {
        let value = serde_json::to_value(Entry {
            amount,
            at: at().into(),
        })
        .expect("serialise entry");
        assert_eq!(value["amount"], expected);
    }

    #[test]
    fn new_timestamps_render_with_milliseconds() {
        let value = serde_json::to_value(Entry {
            amount: Decimal::ONE,
            at: at().into(),
        })
        .expect("serialise entry");
        assert_eq!(value["at"], json!("2024-05-01T09:30:00.000Z"));
    }

    #[rstest]
    #[case::millis("2024-05-01T09:30:00.000Z")]
    #[case::seconds("2024-05-01T09:30:00Z")]
    #[case::offset("2024-05-01T10:30:00+01:00")]
    fn stored_timestamps_keep_their_text(#[case] text: &str) {
        let raw = json!({ "amount": 1, "at": text });
        let entry: Entry = serde_json::from_value(raw.clone()).expect("entry decodes");

        assert_eq!(entry.at, at());
        assert_eq!(entry.at.to_string(), text);
        assert_eq!(serde_json::to_value(&entry).expect("entry encodes"), raw);
    }

    #[test]
    fn timestamps_compare_by_instant() {
        let stored: Timestamp =
            serde_json::from_value(json!("2024-05-01T09:30:00Z")).expect("timestamp decodes");
        assert_eq!(stored, Timestamp::new(at()));
    }

    #[test]
    fn rejects_malformed_timestamps() {
        let result = serde_json::from_value::<Timestamp>(json!("yesterday"));
        assert!(result.is_err());
    }

    #[test]
    fn stored_entries_decode_from_integer_and_float_amounts() {
        let whole: Entry =
            serde_json::from_value(json!({ "amount": 500, "at": "2024-05-01T09:30:00.000Z" }))
                .expect("integer amount decodes");
        let fractional: Entry =
            serde_json::from_value(json!({ "amount": 0.1, "at": "2024-05-01T09:30:00Z" }))
                .expect("float amount decodes");

        assert_eq!(whole.amount, Decimal::new(500, 0));
        assert_eq!(fractional.amount, Decimal::new(1, 1));
        assert_eq!(whole.at, at());
    }
}
