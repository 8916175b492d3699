//! The normalized content record submitted to both APIs

use serde::{Serialize, Serializer};

/// Sentinel written when the rating cell is not a plain number
pub const NOT_RATED: &str = "NR";

/// Rating index: a number when the source cell is all digits, else "NR"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingIndex {
    Rated(u64),
    NotRated,
}

impl RatingIndex {
    /// Parse a trimmed cell value.
    ///
    /// Returns `Err` only when the cell is all digits but too large for `u64`.
    pub fn parse(value: &str) -> Result<Self, std::num::ParseIntError> {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            value.parse().map(RatingIndex::Rated)
        } else {
            Ok(RatingIndex::NotRated)
        }
    }
}

impl Serialize for RatingIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatingIndex::Rated(n) => serializer.serialize_u64(*n),
            RatingIndex::NotRated => serializer.serialize_str(NOT_RATED),
        }
    }
}

/// Render the primary category as a one-element bracketed list, or `[]`
pub fn bracket_category(value: &str) -> String {
    if value.is_empty() {
        "[]".to_string()
    } else {
        format!("[{}]", value)
    }
}

/// Payload for one catalog row. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPayload {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "TYPE")]
    pub content_type: String,
    #[serde(rename = "TITLE")]
    pub title: String,
    #[serde(rename = "DESCRIPTION")]
    pub description: String,
    #[serde(rename = "LANGUAGECODE")]
    pub language_code: String,
    #[serde(rename = "PRIMARYCATEGORY")]
    pub primary_category: String,
    #[serde(rename = "ACTORS")]
    pub actors: String,
    #[serde(rename = "DIRECTOR")]
    pub director: String,
    #[serde(rename = "CONTENT_REGION")]
    pub content_region: String,
    #[serde(rename = "RATING_INDEX")]
    pub rating_index: RatingIndex,
}
