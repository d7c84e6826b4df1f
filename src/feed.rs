//! RSS 2.0 feed generation.
//!
//! One item per (post, locale) pair that has a slug for that locale: the
//! base locale always contributes an item when the post has a slug and a
//! date, and each translated slug contributes one more. Translations share
//! the base post's date and image; they never carry their own.
//!
//! Unlike the sitemap, the feed refuses to serve partial output: any
//! upstream failure propagates and the route answers 404.

use anyhow::{anyhow, Context, Result};
use rss::{ChannelBuilder, EnclosureBuilder, GuidBuilder, ItemBuilder};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::config::SiteConfig;
use crate::content::{normalize_summary, ContentRecord, ContentSource};
use crate::locales::{Locale, DEFAULT_LOCALE, SUPPORTED_LOCALES};
use crate::urls::canonical_url;

pub const DEFAULT_FEED_LIMIT: usize = 20;

// The enclosure MIME type is asserted, not sniffed from the URL. Kept as-is
// for parity with the crawler-facing behavior of the previous stack.
const ENCLOSURE_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fetch posts and serialize the feed. Errors propagate to the caller.
pub async fn build(
    source: &dyn ContentSource,
    config: &SiteConfig,
    limit: usize,
) -> Result<String> {
    let posts = source
        .blog_posts_for_feed()
        .await
        .context("fetching posts for feed")?;
    metrics::counter!("feed_builds_total").increment(1);
    let items = feed_items(config, &posts, limit);
    to_xml(config, &items)
}

/// Expand posts into per-locale feed items, newest first, capped at `limit`.
pub fn feed_items(config: &SiteConfig, posts: &[ContentRecord], limit: usize) -> Vec<FeedItem> {
    let mut items = Vec::new();

    for post in posts {
        let Some(created_at) = post.created_at else {
            continue;
        };

        if let Some(slug) = post.slug.as_deref() {
            items.push(make_item(config, post, DEFAULT_LOCALE, slug, None, created_at));
        }

        for &locale in SUPPORTED_LOCALES {
            if locale == DEFAULT_LOCALE {
                continue;
            }
            // Only a translation with its own slug earns an extra item.
            if let Some(t) = post.translations.get(&locale) {
                if let Some(slug) = t.slug.as_deref() {
                    items.push(make_item(config, post, locale, slug, Some(locale), created_at));
                }
            }
        }
    }

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    items
}

fn make_item(
    config: &SiteConfig,
    post: &ContentRecord,
    locale: Locale,
    slug: &str,
    translated: Option<Locale>,
    created_at: OffsetDateTime,
) -> FeedItem {
    let translation = translated.and_then(|l| post.translations.get(&l));
    let title = translation
        .and_then(|t| t.title.clone())
        .unwrap_or_else(|| post.title.clone());
    let description = translation
        .and_then(|t| t.description.clone())
        .or_else(|| post.description.clone());

    FeedItem {
        title,
        link: canonical_url(&config.base_url, locale, &format!("/blog/{slug}/")),
        description,
        image_url: post.image_url.clone(),
        created_at,
    }
}

fn to_xml(config: &SiteConfig, items: &[FeedItem]) -> Result<String> {
    let rss_items: Vec<rss::Item> = items
        .iter()
        .map(|item| {
            let pub_date = item
                .created_at
                .format(&Rfc2822)
                .context("formatting pubDate")?;

            let mut builder = ItemBuilder::default();
            builder
                .title(item.title.clone())
                .link(Some(item.link.clone()))
                .guid(
                    GuidBuilder::default()
                        .permalink(true)
                        .value(item.link.clone())
                        .build(),
                )
                .pub_date(pub_date);
            if let Some(desc) = &item.description {
                builder.description(normalize_summary(desc));
            }
            if let Some(image) = &item.image_url {
                builder.enclosure(
                    EnclosureBuilder::default()
                        .url(image.clone())
                        .mime_type(ENCLOSURE_MIME.to_string())
                        .length("0".to_string())
                        .build(),
                );
            }
            Ok(builder.build())
        })
        .collect::<Result<_>>()?;

    let channel = ChannelBuilder::default()
        .title("Photomuse Blog")
        .link(config.base_url.clone())
        .description("AI photo generation tips, product news and guides.")
        .language(Some(DEFAULT_LOCALE.as_str().to_string()))
        .generator(Some("photomuse-seo".to_string()))
        .items(rss_items)
        .build();

    use rss::validation::Validate;
    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use time::macros::datetime;

    use super::*;
    use crate::content::Translation;

    fn test_config() -> SiteConfig {
        SiteConfig::for_tests("https://example.com", "https://api.example.com")
    }

    fn post(slug: &str, created_at: OffsetDateTime) -> ContentRecord {
        ContentRecord {
            slug: Some(slug.to_string()),
            created_at: Some(created_at),
            title: format!("Post {slug}"),
            description: Some("<p>Summary</p>".to_string()),
            image_url: None,
            translations: BTreeMap::new(),
        }
    }

    #[test]
    fn translated_slug_yields_second_item_with_same_date() {
        let mut p = post("golden-hour", datetime!(2025-06-01 12:00:00 UTC));
        p.translations.insert(
            Locale::Ru,
            Translation {
                slug: Some("zolotoy-chas".into()),
                title: Some("Золотой час".into()),
                description: None,
            },
        );

        let items = feed_items(&test_config(), &[p], DEFAULT_FEED_LIMIT);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].created_at, items[1].created_at);

        let ru = items
            .iter()
            .find(|i| i.link == "https://example.com/ru/blog/zolotoy-chas/")
            .expect("ru item");
        assert_eq!(ru.title, "Золотой час");
        // Description falls back to the base post's.
        assert_eq!(ru.description.as_deref(), Some("<p>Summary</p>"));
    }

    #[test]
    fn translation_without_slug_yields_no_item() {
        let mut p = post("golden-hour", datetime!(2025-06-01 12:00:00 UTC));
        p.translations.insert(
            Locale::De,
            Translation {
                slug: None,
                title: Some("Goldene Stunde".into()),
                description: None,
            },
        );
        let items = feed_items(&test_config(), &[p], DEFAULT_FEED_LIMIT);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn post_without_date_is_skipped_entirely() {
        let mut p = post("undated", datetime!(2025-06-01 12:00:00 UTC));
        p.created_at = None;
        assert!(feed_items(&test_config(), &[p], DEFAULT_FEED_LIMIT).is_empty());
    }

    #[test]
    fn items_are_sorted_newest_first_and_capped() {
        let posts: Vec<ContentRecord> = (0..30i64)
            .map(|i| {
                post(
                    &format!("post-{i}"),
                    datetime!(2025-01-01 00:00:00 UTC) + time::Duration::days(i),
                )
            })
            .collect();

        let items = feed_items(&test_config(), &posts, 5);
        assert_eq!(items.len(), 5);
        for pair in items.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(items[0].link, "https://example.com/blog/post-29/");
    }

    #[test]
    fn xml_has_permalink_guid_rfc2822_date_and_enclosure() {
        let mut p = post("with-image", datetime!(2025-06-01 12:00:00 UTC));
        p.image_url = Some("https://cdn.example.com/hero.webp".into());
        let cfg = test_config();
        let items = feed_items(&cfg, &[p], DEFAULT_FEED_LIMIT);
        let xml = to_xml(&cfg, &items).unwrap();

        assert!(xml.contains("<link>https://example.com/blog/with-image/</link>"));
        // guid is permalink-style: same URL, and never marked non-permalink
        assert!(xml.contains("https://example.com/blog/with-image/</guid>"));
        assert!(!xml.contains("isPermaLink=\"false\""));
        assert!(xml.contains("Sun, 01 Jun 2025 12:00:00 +0000"));
        // MIME is asserted regardless of the actual extension.
        assert!(xml.contains("type=\"image/jpeg\""));
        assert!(xml.contains("https://cdn.example.com/hero.webp"));
        // Description is normalized before serialization.
        assert!(!xml.contains("<p>Summary</p>"));
    }
}
