//! Header resolution for the catalog worksheet
//!
//! Row 1 of the worksheet names the columns. Names are compared after trimming
//! and lowercasing, and every column in [`Column::ALL`] must be present before
//! any data row is read.

use std::fmt;

const COLUMN_COUNT: usize = 13;

/// Columns the sync reads from or writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Type,
    Title,
    Description,
    LanguageCode,
    PrimaryCategory,
    Actors,
    Director,
    ContentRegion,
    RatingIndex,
    RegistrationUrl,
    Payload,
    FullUrl,
}

impl Column {
    /// Every required column, in the order missing ones are reported
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Id,
        Column::Type,
        Column::Title,
        Column::Description,
        Column::LanguageCode,
        Column::PrimaryCategory,
        Column::Actors,
        Column::Director,
        Column::ContentRegion,
        Column::RatingIndex,
        Column::RegistrationUrl,
        Column::Payload,
        Column::FullUrl,
    ];

    /// Normalized header text for this column
    pub fn header_name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Type => "type",
            Column::Title => "title",
            Column::Description => "description",
            Column::LanguageCode => "languagecode",
            Column::PrimaryCategory => "primarycategory",
            Column::Actors => "actors",
            Column::Director => "director",
            Column::ContentRegion => "content_region",
            Column::RatingIndex => "rating_index",
            Column::RegistrationUrl => "rg-srv url",
            Column::Payload => "payload",
            Column::FullUrl => "full url",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_name())
    }
}

/// Raised when the header row lacks one or more required columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingHeaders {
    pub missing: Vec<String>,
}

impl fmt::Display for MissingHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing required headers: {}", self.missing.join(", "))
    }
}

impl std::error::Error for MissingHeaders {}

/// Resolved 1-based column positions for every required column
#[derive(Debug, Clone)]
pub struct HeaderMap {
    indices: [u32; COLUMN_COUNT],
    normalized: Vec<String>,
}

impl HeaderMap {
    /// Build the map from the raw header row.
    ///
    /// When a name appears more than once the left-most column wins.
    pub fn resolve(header_row: &[String]) -> Result<Self, MissingHeaders> {
        let normalized: Vec<String> = header_row.iter().map(|h| normalize(h)).collect();

        let mut indices = [0u32; COLUMN_COUNT];
        let mut missing = Vec::new();

        for column in Column::ALL {
            match normalized.iter().position(|h| h == column.header_name()) {
                Some(pos) => indices[column.slot()] = pos as u32 + 1,
                None => missing.push(column.header_name().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(MissingHeaders { missing });
        }

        Ok(Self {
            indices,
            normalized,
        })
    }

    /// 1-based position of a required column
    pub fn index(&self, column: Column) -> u32 {
        self.indices[column.slot()]
    }

    /// All header names after normalization, in sheet order
    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    /// Trimmed cell value for `column`, or empty when the row stops short of it
    pub fn get<'a>(&self, row: &'a [String], column: Column) -> &'a str {
        let pos = self.index(column) as usize - 1;
        row.get(pos).map(|s| s.trim()).unwrap_or("")
    }
}

fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_header() -> Vec<String> {
        header_row(&[
            " ID ",
            "Type",
            "Title",
            "Description",
            "LanguageCode",
            "PrimaryCategory",
            "Actors",
            "Director",
            "Content_Region",
            "Rating_Index",
            "RG-SRV URL",
            "Payload",
            "Full URL",
        ])
    }

    #[test]
    fn test_resolve_normalizes_names() {
        let map = HeaderMap::resolve(&full_header()).unwrap();
        assert_eq!(map.index(Column::Id), 1);
        assert_eq!(map.index(Column::RegistrationUrl), 11);
        assert_eq!(map.index(Column::FullUrl), 13);
        assert_eq!(map.normalized()[0], "id");
    }

    #[test]
    fn test_resolve_reports_all_missing_in_order() {
        let mut headers = full_header();
        headers.retain(|h| h != "Actors" && h != "Full URL");

        let err = HeaderMap::resolve(&headers).unwrap_err();
        assert_eq!(err.missing, vec!["actors".to_string(), "full url".to_string()]);
        assert_eq!(err.to_string(), "Missing required headers: actors, full url");
    }

    #[test]
    fn test_duplicate_header_uses_first() {
        let mut headers = full_header();
        headers.push("id".to_string());
        let map = HeaderMap::resolve(&headers).unwrap();
        assert_eq!(map.index(Column::Id), 1);
    }

    #[test]
    fn test_get_short_row_is_empty() {
        let map = HeaderMap::resolve(&full_header()).unwrap();
        let row = header_row(&["  42 ", "movie"]);
        assert_eq!(map.get(&row, Column::Id), "42");
        assert_eq!(map.get(&row, Column::Type), "movie");
        assert_eq!(map.get(&row, Column::Title), "");
        assert_eq!(map.get(&row, Column::FullUrl), "");
    }
}
