//! Normalized response and pagination types

use serde::{Deserialize, Serialize};

use crate::{Result, TourismError};

/// One upstream record. Field names are the upstream's own (`contentid`,
/// `title`, `addr1`, ...); their set varies by operation and language.
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Uniform paginated shape every upstream payload is normalized into.
///
/// Absent upstream fields become empty/zero here, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub num_of_rows: u32,
}

impl NormalizedResponse {
    /// An empty result for the given page.
    pub fn empty(page: Page) -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
            page_no: page.page,
            num_of_rows: 0,
        }
    }

    /// First item, or an empty record when there are none.
    pub fn first_item(&self) -> Item {
        self.items.first().cloned().unwrap_or_default()
    }
}

/// Requested pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub rows: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, rows: 20 }
    }
}

impl Page {
    /// Build a page, rejecting zero page numbers or zero rows.
    pub fn new(page: u32, rows: u32) -> Result<Self> {
        if page == 0 {
            return Err(TourismError::InvalidArgument(
                "page must be 1 or greater".to_string(),
            ));
        }
        if rows == 0 {
            return Err(TourismError::InvalidArgument(
                "rows must be 1 or greater".to_string(),
            ));
        }
        Ok(Self { page, rows })
    }
}
