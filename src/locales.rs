//! Supported locales for the marketing site.
//!
//! One locale is the default and lives at the URL root; every other locale is
//! served under a `/{code}/` path prefix. The set is closed on purpose: the
//! backend may start returning translations for a locale before the site
//! ships it, and those must be ignored rather than leak into the sitemap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ru,
    Es,
    De,
    Ja,
}

/// Every locale the site serves, default first.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ru, Locale::Es, Locale::De, Locale::Ja];

/// The locale served at the URL root (no path prefix).
pub const DEFAULT_LOCALE: Locale = Locale::En;

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Es => "es",
            Locale::De => "de",
            Locale::Ja => "ja",
        }
    }

    pub fn is_default(self) -> bool {
        self == DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "es" => Ok(Locale::Es),
            "de" => Ok(Locale::De),
            "ja" => Ok(Locale::Ja),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale code '{0}'")]
pub struct UnknownLocale(pub String);
