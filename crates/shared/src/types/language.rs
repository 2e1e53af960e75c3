//! Language selection for localized names.

use serde::{Deserialize, Serialize};

/// Which of the three stored translations a report should display.
///
/// Stored names carry a default text plus optional preferred and supportive
/// translations. Any selector value other than 1 or 2 means the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum LanguageSelector {
    /// Default language (selector `0`).
    #[default]
    Default,
    /// Preferred language (selector `1`).
    Preferred,
    /// Supportive language (selector `2`).
    Supportive,
}

impl From<i32> for LanguageSelector {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Preferred,
            2 => Self::Supportive,
            _ => Self::Default,
        }
    }
}

impl From<LanguageSelector> for i32 {
    fn from(selector: LanguageSelector) -> Self {
        match selector {
            LanguageSelector::Default => 0,
            LanguageSelector::Preferred => 1,
            LanguageSelector::Supportive => 2,
        }
    }
}
