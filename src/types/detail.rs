//! Composition of the three detail lookups into one record.

use serde_json::Value;

use super::response::Item;

/// Key under which the type-specific "additional info" rows are attached.
pub const ADDITIONAL_INFO_KEY: &str = "additional_info";

/// The pieces of a detail lookup before they are merged.
///
/// Precedence is left to right: `common`, then `intro`, then
/// `additional_info`. A later piece overwrites a key an earlier piece set;
/// `additional_info` only ever writes its own key, so it can displace a
/// common/intro field solely when that field is itself named
/// `additional_info`.
#[derive(Debug, Clone, Default)]
pub struct DetailRecord {
    /// First item of the common detail lookup.
    pub common: Item,
    /// First item of the type-specific intro lookup, if one was made.
    pub intro: Option<Item>,
    /// All rows of the type-specific info lookup, if one was made.
    pub additional_info: Option<Vec<Item>>,
}

impl DetailRecord {
    /// Merge into a single flat record.
    pub fn merge(self) -> Item {
        let mut merged = self.common;
        if let Some(intro) = self.intro {
            merged.extend(intro);
        }
        if let Some(rows) = self.additional_info {
            merged.insert(
                ADDITIONAL_INFO_KEY.to_string(),
                Value::Array(rows.into_iter().map(Value::Object).collect()),
            );
        }
        merged
    }
}
