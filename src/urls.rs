//! Locale-aware URL construction.
//!
//! The default locale lives at the URL root; every other locale is prefixed
//! with `/{code}`. All generated paths carry a trailing slash so that the
//! sitemap, the RSS feed and the hreflang alternates agree byte-for-byte on
//! what a page's URL is.

use std::collections::BTreeMap;

use crate::locales::{Locale, DEFAULT_LOCALE};

/// Locale-prefixed, trailing-slash-normalized path.
///
/// `path` must start with `/`; anything else is a caller bug, not a runtime
/// condition, so this asserts.
pub fn locale_path(locale: Locale, path: &str) -> String {
    assert!(path.starts_with('/'), "path must start with '/': {path:?}");

    let mut normalized = path.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    if locale.is_default() {
        normalized
    } else {
        format!("/{}{}", locale.as_str(), normalized)
    }
}

/// Absolute URL for `path` in `locale`, rooted at `base_url`.
pub fn canonical_url(base_url: &str, locale: Locale, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), locale_path(locale, path))
}

/// Hreflang alternate map for one logical path: one entry per supplied
/// locale plus `x-default`.
///
/// `x-default` points at the default locale's URL; if the default locale is
/// not in `locales`, the first supplied locale stands in.
pub fn hreflang_languages(
    base_url: &str,
    locales: &[Locale],
    path: &str,
) -> BTreeMap<String, String> {
    let mut languages = BTreeMap::new();
    for &locale in locales {
        languages.insert(
            locale.as_str().to_string(),
            canonical_url(base_url, locale, path),
        );
    }

    let x_default = if locales.contains(&DEFAULT_LOCALE) {
        Some(DEFAULT_LOCALE)
    } else {
        locales.first().copied()
    };
    if let Some(locale) = x_default {
        languages.insert(
            "x-default".to_string(),
            canonical_url(base_url, locale, path),
        );
    }

    languages
}
