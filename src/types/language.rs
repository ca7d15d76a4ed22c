//! Response languages and the upstream services that serve them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, TourismError};

/// Language of the upstream response.
///
/// The upstream API exposes one service per language; the language picks
/// the path segment (e.g. `EngService1`) rather than a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Korean,
    #[default]
    English,
    Japanese,
    SimplifiedChinese,
    TraditionalChinese,
    German,
    French,
    Spanish,
    Russian,
}

const LANGUAGES: [(Language, &str, &str); 9] = [
    (Language::Korean, "ko", "KorService1"),
    (Language::English, "en", "EngService1"),
    (Language::Japanese, "jp", "JpnService1"),
    (Language::SimplifiedChinese, "zh-cn", "ChsService1"),
    (Language::TraditionalChinese, "zh-tw", "ChtService1"),
    (Language::German, "de", "GerService1"),
    (Language::French, "fr", "FreService1"),
    (Language::Spanish, "es", "SpnService1"),
    (Language::Russian, "ru", "RusService1"),
];

impl Language {
    /// Every supported language, Korean first.
    pub fn all() -> impl Iterator<Item = Language> {
        LANGUAGES.iter().map(|(lang, _, _)| *lang)
    }

    /// Short code used by callers (`en`, `jp`, `zh-cn`, ...).
    pub fn code(self) -> &'static str {
        LANGUAGES[self as usize].1
    }

    /// Upstream service path segment.
    pub fn service(self) -> &'static str {
        LANGUAGES[self as usize].2
    }

    /// Parse a language code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self> {
        let wanted = code.trim().to_lowercase();
        LANGUAGES
            .iter()
            .find(|(_, c, _)| *c == wanted)
            .map(|(lang, _, _)| *lang)
            .ok_or_else(|| {
                let valid: Vec<&str> = LANGUAGES.iter().map(|(_, c, _)| *c).collect();
                TourismError::InvalidArgument(format!(
                    "Invalid language: '{code}'. Valid languages are: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TourismError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::parse(&code).map_err(serde::de::Error::custom)
    }
}
