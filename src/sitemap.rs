//! Sitemap generation.
//!
//! Produces one `<urlset>` document covering the static marketing pages and
//! every blog post / use case, with one `<url>` per (resource, locale) pair.
//! All entries for the same logical resource share one identical hreflang
//! alternate map; that shared map is what keeps reciprocal hreflang links
//! consistent across locales.

use std::collections::BTreeMap;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::config::SiteConfig;
use crate::content::{ContentRecord, ContentSource};
use crate::locales::SUPPORTED_LOCALES;
use crate::urls::{canonical_url, hreflang_languages};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: OffsetDateTime,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
    /// Locale code (or `x-default`) to alternate URL.
    pub alternate_languages: BTreeMap<String, String>,
    pub images: Vec<String>,
}

/// Fetch content and build the full sitemap. Both fetches degrade to empty
/// on backend failure, so the worst case is a static-only sitemap.
pub async fn build(source: &dyn ContentSource, config: &SiteConfig) -> Vec<SitemapEntry> {
    let (posts, use_cases) = tokio::join!(
        source.blog_posts_for_sitemap(),
        source.use_cases_for_sitemap()
    );
    metrics::counter!("sitemap_builds_total").increment(1);
    build_entries(config, &posts, &use_cases)
}

pub fn build_entries(
    config: &SiteConfig,
    posts: &[ContentRecord],
    use_cases: &[ContentRecord],
) -> Vec<SitemapEntry> {
    let now = OffsetDateTime::now_utc();
    let base = config.base_url.as_str();
    let mut entries = Vec::new();

    // Static pages. One hreflang map per logical path, shared by every
    // locale's entry for that path.
    let statics: [(&str, f32, ChangeFrequency); 4] = [
        ("/", 0.9, ChangeFrequency::Daily),
        ("/blog/", 0.8, ChangeFrequency::Daily),
        ("/use-cases/", 0.8, ChangeFrequency::Daily),
        ("/support/", 0.7, ChangeFrequency::Monthly),
    ];
    let static_maps: Vec<BTreeMap<String, String>> = statics
        .iter()
        .map(|(path, _, _)| hreflang_languages(base, SUPPORTED_LOCALES, path))
        .collect();

    entries.push(SitemapEntry {
        url: base.to_string(),
        last_modified: now,
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
        alternate_languages: static_maps[0].clone(),
        images: Vec::new(),
    });

    for &locale in SUPPORTED_LOCALES {
        for ((path, priority, freq), map) in statics.iter().zip(&static_maps) {
            entries.push(SitemapEntry {
                url: canonical_url(base, locale, path),
                last_modified: now,
                change_frequency: *freq,
                priority: *priority,
                alternate_languages: map.clone(),
                images: Vec::new(),
            });
        }
    }

    for post in posts {
        push_content_entries(&mut entries, base, post, "/blog", now);
    }
    for use_case in use_cases {
        push_content_entries(&mut entries, base, use_case, "/use-cases", now);
    }

    entries
}

/// Emit one entry per locale for a content record, all sharing a single
/// alternate map. Each locale's URL uses whatever slug is canonical for that
/// locale (translated slug when present).
fn push_content_entries(
    entries: &mut Vec<SitemapEntry>,
    base: &str,
    record: &ContentRecord,
    prefix: &str,
    now: OffsetDateTime,
) {
    if record.slug.is_none() {
        return;
    }

    let alternate_languages = content_alternates(base, record, prefix);
    let last_modified = record.created_at.unwrap_or(now);
    let images: Vec<String> = record.image_url.iter().cloned().collect();

    for &locale in SUPPORTED_LOCALES {
        let url = alternate_languages[locale.as_str()].clone();
        entries.push(SitemapEntry {
            url,
            last_modified,
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.7,
            alternate_languages: alternate_languages.clone(),
            images: images.clone(),
        });
    }
}

fn content_alternates(
    base: &str,
    record: &ContentRecord,
    prefix: &str,
) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for &locale in SUPPORTED_LOCALES {
        // push_content_entries only runs with a base slug present
        let slug = record.slug_for(locale).unwrap_or_default();
        map.insert(
            locale.as_str().to_string(),
            canonical_url(base, locale, &format!("{prefix}/{slug}/")),
        );
    }
    let default_url = map[crate::locales::DEFAULT_LOCALE.as_str()].clone();
    map.insert("x-default".to_string(), default_url);
    map
}

/// Serialize entries as a sitemap.org urlset with xhtml alternates and
/// image extensions.
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    use quick_xml::escape::escape;

    let mut xml = String::with_capacity(entries.len() * 512 + 256);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<urlset xmlns=\"{SITEMAP_NS}\" xmlns:xhtml=\"{XHTML_NS}\" xmlns:image=\"{IMAGE_NS}\">\n"
    ));

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(entry.url.as_str())));
        if let Ok(lastmod) = entry.last_modified.format(&Rfc3339) {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        for (lang, href) in &entry.alternate_languages {
            xml.push_str(&format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                escape(lang.as_str()),
                escape(href.as_str())
            ));
        }
        for image in &entry.images {
            xml.push_str(&format!(
                "    <image:image><image:loc>{}</image:loc></image:image>\n",
                escape(image.as_str())
            ));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
