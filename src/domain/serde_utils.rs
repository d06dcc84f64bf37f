//! Serde helpers for loosely-typed backend payloads.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Deserializes an identifier that the backend may send as a string or a number.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor an integer.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer identifier")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Optional variant of [`id_string`].
///
/// # Errors
///
/// Returns an error if a present value is neither a string nor an integer.
pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

/// Deserializes a role list that may arrive as `"USER"`, `"USER,ADMIN"` or `["USER"]`.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor a sequence of strings.
pub fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RolesVisitor;

    impl<'de> Visitor<'de> for RolesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(String::from)
                .collect())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut roles = Vec::new();
            while let Some(role) = seq.next_element::<String>()? {
                roles.push(role);
            }
            Ok(roles)
        }
    }

    deserializer.deserialize_any(RolesVisitor)
}

/// Deserializes an optional calendar date from `YYYY-MM-DD` or a full RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if a present value does not start with a valid date.
pub fn opt_flexible_date<'de, D>(deserializer: D) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let date_part = raw.get(..10).unwrap_or(&raw);
    chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(de::Error::custom)
}
