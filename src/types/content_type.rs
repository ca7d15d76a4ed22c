//! Tourism content categories and their upstream numeric codes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, TourismError};

/// Category of a tourism item, as understood by the upstream API.
///
/// Callers name categories with human labels ("Tourist Attraction"); the
/// upstream wants numeric `contentTypeId` codes. The mapping is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    TouristAttraction,
    CulturalFacility,
    FestivalEvent,
    LeisureActivity,
    Accommodation,
    Shopping,
    Restaurant,
    Transportation,
}

/// (variant, upstream code, label), in listing order.
const TABLE: [(ContentType, &str, &str); 8] = [
    (ContentType::TouristAttraction, "76", "Tourist Attraction"),
    (ContentType::CulturalFacility, "78", "Cultural Facility"),
    (ContentType::FestivalEvent, "85", "Festival Event"),
    (ContentType::LeisureActivity, "75", "Leisure Activity"),
    (ContentType::Accommodation, "80", "Accommodation"),
    (ContentType::Shopping, "79", "Shopping"),
    (ContentType::Restaurant, "82", "Restaurant"),
    (ContentType::Transportation, "77", "Transportation"),
];

static BY_LABEL: LazyLock<HashMap<String, ContentType>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|(ty, _, label)| (label.to_lowercase(), *ty))
        .collect()
});

static BY_CODE: LazyLock<HashMap<&'static str, ContentType>> =
    LazyLock::new(|| TABLE.iter().map(|(ty, code, _)| (*code, *ty)).collect());

impl ContentType {
    /// Every category, in listing order.
    pub fn all() -> impl Iterator<Item = ContentType> {
        TABLE.iter().map(|(ty, _, _)| *ty)
    }

    fn entry(self) -> &'static (ContentType, &'static str, &'static str) {
        // TABLE holds one row per variant.
        &TABLE[self as usize]
    }

    /// Upstream `contentTypeId`.
    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.entry().2
    }

    /// Reverse lookup from an upstream code.
    pub fn from_code(code: &str) -> Option<Self> {
        BY_CODE.get(code.trim()).copied()
    }

    /// Resolve a human label, ignoring case and surrounding whitespace.
    ///
    /// Unknown labels fail with [`TourismError::InvalidArgument`] listing
    /// every valid label.
    pub fn from_label(label: &str) -> Result<Self> {
        BY_LABEL
            .get(&label.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                TourismError::InvalidArgument(format!(
                    "Invalid content_type: '{label}'. Valid types are: {}",
                    Self::valid_labels()
                ))
            })
    }

    /// Comma-separated list of valid labels, in listing order.
    pub fn valid_labels() -> String {
        Self::all().map(Self::label).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = TourismError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label).map_err(serde::de::Error::custom)
    }
}
