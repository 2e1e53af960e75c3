//! Localized display names.
//!
//! Every translatable field in the source schema is stored three times: a
//! default text plus optional preferred and supportive translations. All
//! report fields resolve through [`resolve_localized_text`] so the fallback
//! rule lives in exactly one place.

use banquet_shared::types::LanguageSelector;
use serde::{Deserialize, Serialize};

/// A text stored in the default language with two optional translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Default-language text, always present.
    pub default: String,
    /// Preferred-language translation.
    pub preferred: Option<String>,
    /// Supportive-language translation.
    pub supportive: Option<String>,
}

impl LocalizedText {
    /// Creates a text with only the default language filled in.
    #[must_use]
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            preferred: None,
            supportive: None,
        }
    }

    /// Adds translations.
    #[must_use]
    pub fn with_translations(
        mut self,
        preferred: Option<String>,
        supportive: Option<String>,
    ) -> Self {
        self.preferred = preferred;
        self.supportive = supportive;
        self
    }

    /// Resolves the text for the given selector.
    #[must_use]
    pub fn resolve(&self, selector: LanguageSelector) -> &str {
        resolve_localized_text(
            &self.default,
            self.preferred.as_deref(),
            self.supportive.as_deref(),
            selector,
        )
    }
}

/// Picks the translation the selector asks for, falling back to the default
/// text when that translation is missing or empty.
#[must_use]
pub fn resolve_localized_text<'a>(
    default: &'a str,
    preferred: Option<&'a str>,
    supportive: Option<&'a str>,
    selector: LanguageSelector,
) -> &'a str {
    let chosen = match selector {
        LanguageSelector::Preferred => preferred,
        LanguageSelector::Supportive => supportive,
        LanguageSelector::Default => None,
    };

    chosen.filter(|text| !text.is_empty()).unwrap_or(default)
}
