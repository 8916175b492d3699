//! Turn a sheet row into a submission

use anyhow::{Context, Result};
use std::fmt;

use super::payload::{ContentPayload, RatingIndex, bracket_category};
use super::text::to_payload_text;
use crate::sheets::{Column, HeaderMap};

/// Why a row was passed over without any API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The row ends before the payload column
    TooShort,
    /// The payload column already holds a value
    AlreadyProcessed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort => write!(f, "row too short"),
            SkipReason::AlreadyProcessed => write!(f, "already has payload"),
        }
    }
}

/// Everything needed to submit one row and write it back
#[derive(Debug, Clone)]
pub struct RowSubmission {
    /// 1-based sheet row
    pub row: u32,
    pub payload: ContentPayload,
    /// Serialized payload, posted and persisted verbatim
    pub text: String,
    /// Row-specific registration endpoint
    pub registration_url: String,
    /// Derived more-like-this URL for the full url column
    pub full_url: String,
}

/// Builds submissions from rows using a resolved header map
#[derive(Debug, Clone)]
pub struct RowMapper {
    headers: HeaderMap,
    more_like_this_base: String,
}

impl RowMapper {
    pub fn new(headers: HeaderMap, more_like_this_base: impl Into<String>) -> Self {
        Self {
            headers,
            more_like_this_base: more_like_this_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decide whether a row should be left alone
    pub fn skip_reason(&self, row: &[String]) -> Option<SkipReason> {
        let payload_col = self.headers.index(Column::Payload) as usize;
        if row.len() < payload_col {
            return Some(SkipReason::TooShort);
        }
        if !row[payload_col - 1].trim().is_empty() {
            return Some(SkipReason::AlreadyProcessed);
        }
        None
    }

    /// Build the payload, its text, and the URLs for row number `row_index`
    pub fn map(&self, row_index: u32, row: &[String]) -> Result<RowSubmission> {
        let h = &self.headers;

        let rating = h.get(row, Column::RatingIndex);
        let rating_index = RatingIndex::parse(rating)
            .with_context(|| format!("rating_index '{}' is out of range", rating))?;

        let payload = ContentPayload {
            id: h.get(row, Column::Id).to_string(),
            content_type: h.get(row, Column::Type).to_string(),
            title: h.get(row, Column::Title).to_string(),
            description: h.get(row, Column::Description).to_string(),
            language_code: h.get(row, Column::LanguageCode).to_string(),
            primary_category: bracket_category(h.get(row, Column::PrimaryCategory)),
            actors: h.get(row, Column::Actors).to_string(),
            director: h.get(row, Column::Director).to_string(),
            content_region: h.get(row, Column::ContentRegion).to_string(),
            rating_index,
        };

        let registration_url = h.get(row, Column::RegistrationUrl).to_string();
        let full_url = format!(
            "{}/{}?acl={}",
            self.more_like_this_base, payload.id, payload.language_code
        );
        let text = to_payload_text(&payload)?;

        Ok(RowSubmission {
            row: row_index,
            payload,
            text,
            registration_url,
            full_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://rg-srv.api.aha.firstlight.ai/recommendation/more-like-this";

    fn headers() -> HeaderMap {
        let names: Vec<String> = Column::ALL
            .iter()
            .map(|c| c.header_name().to_uppercase())
            .collect();
        HeaderMap::resolve(&names).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sample_row() -> Vec<String> {
        row(&[
            "42",
            "movie",
            " Baahubali ",
            "An epic",
            "en-US",
            "Action",
            "Prabhas",
            "S. S. Rajamouli",
            "IN",
            "7",
            "https://x/ingest",
            "",
            "",
        ])
    }

    #[test]
    fn test_skip_reason() {
        let mapper = RowMapper::new(headers(), BASE);
        assert_eq!(mapper.skip_reason(&row(&["1", "movie"])), Some(SkipReason::TooShort));

        let mut done = sample_row();
        done[11] = "{\"ID\": \"42\"}".to_string();
        assert_eq!(mapper.skip_reason(&done), Some(SkipReason::AlreadyProcessed));

        let mut blank = sample_row();
        blank[11] = "   ".to_string();
        assert_eq!(mapper.skip_reason(&blank), None);

        // Row ends exactly at the payload column
        assert_eq!(mapper.skip_reason(&sample_row()[..12]), None);
    }

    #[test]
    fn test_map_builds_payload_and_urls() {
        let mapper = RowMapper::new(headers(), format!("{}/", BASE));
        let submission = mapper.map(2, &sample_row()).unwrap();

        assert_eq!(submission.row, 2);
        assert_eq!(submission.payload.title, "Baahubali");
        assert_eq!(submission.payload.primary_category, "[Action]");
        assert_eq!(submission.payload.rating_index, RatingIndex::Rated(7));
        assert_eq!(submission.registration_url, "https://x/ingest");
        assert_eq!(
            submission.full_url,
            "https://rg-srv.api.aha.firstlight.ai/recommendation/more-like-this/42?acl=en-US"
        );
        assert_eq!(
            submission.text,
            "{\"ID\": \"42\", \"TYPE\": \"movie\", \"TITLE\": \"Baahubali\", \
             \"DESCRIPTION\": \"An epic\", \"LANGUAGECODE\": \"en-US\", \
             \"PRIMARYCATEGORY\": \"[Action]\", \"ACTORS\": \"Prabhas\", \
             \"DIRECTOR\": \"S. S. Rajamouli\", \"CONTENT_REGION\": \"IN\", \"RATING_INDEX\": 7}"
        );
    }

    #[test]
    fn test_map_empty_category_and_unrated() {
        let mapper = RowMapper::new(headers(), BASE);
        let mut cells = sample_row();
        cells[5] = "  ".to_string();
        cells[9] = "12a".to_string();

        let submission = mapper.map(3, &cells).unwrap();
        assert_eq!(submission.payload.primary_category, "[]");
        assert!(submission.text.ends_with("\"RATING_INDEX\": \"NR\"}"));
    }

    #[test]
    fn test_map_keeps_non_ascii() {
        let mapper = RowMapper::new(headers(), BASE);
        let mut cells = sample_row();
        cells[2] = "బాహుబలి".to_string();

        let submission = mapper.map(2, &cells).unwrap();
        assert!(submission.text.contains("\"TITLE\": \"బాహుబలి\""));
    }

    #[test]
    fn test_map_passes_registration_url_through() {
        let mapper = RowMapper::new(headers(), BASE);
        let cases = [
            ("", ""),
            (" not a url ", "not a url"),
            ("ftp://x/ingest", "ftp://x/ingest"),
        ];
        for (raw, expected) in cases {
            let mut cells = sample_row();
            cells[10] = raw.to_string();
            let submission = mapper.map(2, &cells).unwrap();
            assert_eq!(submission.registration_url, expected);
        }
    }

    #[test]
    fn test_map_rejects_rating_overflow() {
        let mapper = RowMapper::new(headers(), BASE);
        let mut cells = sample_row();
        cells[9] = "184467440737095516160".to_string();
        let err = mapper.map(2, &cells).unwrap_err();
        assert!(err.to_string().contains("rating_index"));
    }
}
