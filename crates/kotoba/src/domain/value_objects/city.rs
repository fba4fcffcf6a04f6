//! City - weather lookup locations
//!
//! Resolution is an ordered substring table; the first entry with a
//! matching alias wins.

use serde::{Deserialize, Serialize};

/// A city the chat classifier can resolve from free text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Taipei,
    Taichung,
    Kaohsiung,
}

/// Ordered resolution table. Aliases are matched against lowercased text.
const CITY_TABLE: &[(City, &[&str])] = &[
    (City::Taipei, &["台北", "臺北", "taipei"]),
    (City::Taichung, &["台中", "臺中", "taichung"]),
    (City::Kaohsiung, &["高雄", "kaohsiung"]),
];

impl City {
    /// Resolve the first city mentioned in `text`
    pub fn resolve(text: &str) -> Option<City> {
        let lowered = text.to_lowercase();
        CITY_TABLE
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| lowered.contains(alias)))
            .map(|(city, _)| *city)
    }

    /// Location name understood by the weather API
    pub fn canonical_name(&self) -> &'static str {
        match self {
            City::Taipei => "臺北市",
            City::Taichung => "臺中市",
            City::Kaohsiung => "高雄市",
        }
    }

    /// Canonical name for a known alias, otherwise the trimmed input verbatim.
    ///
    /// Used by operator-facing endpoints where the caller names the location
    /// deliberately.
    pub fn canonical_or_verbatim(name: &str) -> String {
        match City::resolve(name) {
            Some(city) => city.canonical_name().to_string(),
            None => name.trim().to_string(),
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}
