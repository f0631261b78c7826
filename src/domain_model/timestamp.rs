use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use serde::{Deserialize, Deserializer, de};

/// RFC 3339, or an ISO timestamp without offset read as UTC.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}
