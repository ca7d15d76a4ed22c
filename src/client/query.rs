//! Typed parameters for each upstream operation.

use chrono::NaiveDate;

use crate::types::{ContentType, Language, Page};

/// Keyword search.
#[derive(Debug, Clone, Default)]
pub struct KeywordQuery {
    pub keyword: String,
    pub content_type: Option<ContentType>,
    pub area_code: Option<String>,
    pub language: Option<Language>,
    pub page: Page,
}

impl KeywordQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }
}

/// Area-based listing.
#[derive(Debug, Clone, Default)]
pub struct AreaQuery {
    pub area_code: Option<String>,
    pub sigungu_code: Option<String>,
    pub content_type: Option<ContentType>,
    pub language: Option<Language>,
    pub page: Page,
}

/// Location-based listing around a point.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    pub longitude: f64,
    pub latitude: f64,
    /// Search radius in meters.
    pub radius: u32,
    pub content_type: Option<ContentType>,
    pub language: Option<Language>,
    pub page: Page,
}

/// Festival search by date range.
#[derive(Debug, Clone)]
pub struct FestivalQuery {
    pub start_date: NaiveDate,
    /// `None` means "still running, no end bound".
    pub end_date: Option<NaiveDate>,
    pub area_code: Option<String>,
    pub language: Option<Language>,
    pub page: Page,
}

impl FestivalQuery {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: None,
            area_code: None,
            language: None,
            page: Page::default(),
        }
    }
}

/// Accommodation search.
#[derive(Debug, Clone, Default)]
pub struct StayQuery {
    pub area_code: Option<String>,
    pub sigungu_code: Option<String>,
    pub language: Option<Language>,
    pub page: Page,
}

/// Common detail lookup for one item.
#[derive(Debug, Clone, Default)]
pub struct DetailQuery {
    pub content_id: String,
    pub content_type: Option<ContentType>,
    pub language: Option<Language>,
}

impl DetailQuery {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            ..Self::default()
        }
    }
}

/// Image gallery of one item.
#[derive(Debug, Clone, Default)]
pub struct ImageQuery {
    pub content_id: String,
    pub language: Option<Language>,
    pub page: Page,
}

/// Area code taxonomy; no parent lists the top-level provinces.
#[derive(Debug, Clone, Default)]
pub struct AreaCodeQuery {
    pub parent_area_code: Option<String>,
    pub language: Option<Language>,
    pub page: Page,
}
