//! `<source>` candidate lists for the main image and its placeholder.
//!
//! Browsers pick the first `<source>` whose media query and type match, so
//! the order built here is part of the contract:
//!
//! ```text
//! (max-width: 600px)  image/jpeg   ← art-direction breakpoint 1
//! (max-width: 600px)  image/webp   ← its format fallback, kept adjacent
//! (max-width: 1200px) image/png    ← breakpoint 2
//! (max-width: 1200px) image/webp
//!                     image/jpeg   ← unconditional default, always last
//!                     image/webp
//! ```

use crate::types::{ArtDirectionSource, ImageData};
use serde::Serialize;

/// MIME type used for every placeholder source.
const PLACEHOLDER_EXTENSION: &str = "gif";

/// One `<source>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub srcset: String,
    /// Aspect ratio in percentage form (ratio × 100)
    pub aspect_ratio: f64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_query: Option<String>,
}

impl SourceEntry {
    pub fn new(
        srcset: impl Into<String>,
        aspect_ratio: f64,
        mime_type: Option<&'static str>,
        media_query: Option<&str>,
    ) -> Self {
        Self {
            srcset: srcset.into(),
            aspect_ratio: aspect_ratio * 100.0,
            mime_type,
            media_query: media_query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }
}

/// Map a file extension to its image MIME type.
///
/// Case-insensitive, tolerates a leading dot. Unknown extensions return `None`.
pub fn mime_type(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpe" | "jpeg" | "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tiff" | "tif" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}

/// Srcset for the WebP variant. Falls back to the native srcset when the
/// asset layer produced no WebP rendition.
fn webp_srcset(image: &ImageData) -> &str {
    image
        .src_set_webp
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&image.src_set)
}

fn push_image_sources(
    sources: &mut Vec<SourceEntry>,
    image: &ImageData,
    media_query: Option<&str>,
    webp_support: bool,
) {
    let native = mime_type(&image.extension);
    if native.is_none() {
        tracing::debug!(extension = %image.extension, "unknown extension, emitting source without type");
    }
    sources.push(SourceEntry::new(
        image.src_set.as_str(),
        image.aspect_ratio,
        native,
        media_query,
    ));

    if webp_support {
        sources.push(SourceEntry::new(
            webp_srcset(image),
            image.aspect_ratio,
            mime_type("webp"),
            media_query,
        ));
    }
}

/// Build the main `<source>` list: every breakpoint in order, then the
/// default image, each followed by its WebP variant when enabled.
pub fn build_main_sources(
    image: &ImageData,
    art_direction: &[ArtDirectionSource],
    webp_support: bool,
) -> Vec<SourceEntry> {
    let per_image = if webp_support { 2 } else { 1 };
    let mut sources = Vec::with_capacity((art_direction.len() + 1) * per_image);

    for source in art_direction {
        push_image_sources(
            &mut sources,
            &source.image,
            Some(source.media_query.as_str()),
            webp_support,
        );
    }
    push_image_sources(&mut sources, image, None, webp_support);

    sources
}

/// Build placeholder sources, one per breakpoint, at 1x density.
///
/// Breakpoints without an LQIP payload are skipped so the browser falls
/// through to the default placeholder.
pub fn build_placeholder_sources(art_direction: &[ArtDirectionSource]) -> Vec<SourceEntry> {
    art_direction
        .iter()
        .filter_map(|source| {
            let Some(lqip) = source.image.lqip_base64.as_deref().filter(|s| !s.is_empty()) else {
                tracing::debug!(media_query = %source.media_query, "no placeholder payload for breakpoint");
                return None;
            };
            Some(SourceEntry::new(
                format!("{lqip} 1x"),
                source.image.aspect_ratio,
                mime_type(PLACEHOLDER_EXTENSION),
                Some(source.media_query.as_str()),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{art_source, image};

    #[test]
    fn mime_table_covers_known_extensions() {
        assert_eq!(mime_type("png"), Some("image/png"));
        assert_eq!(mime_type("jpe"), Some("image/jpeg"));
        assert_eq!(mime_type("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_type("jpg"), Some("image/jpeg"));
        assert_eq!(mime_type("gif"), Some("image/gif"));
        assert_eq!(mime_type("bmp"), Some("image/bmp"));
        assert_eq!(mime_type("ico"), Some("image/vnd.microsoft.icon"));
        assert_eq!(mime_type("tif"), Some("image/tiff"));
        assert_eq!(mime_type("tiff"), Some("image/tiff"));
        assert_eq!(mime_type("svg"), Some("image/svg+xml"));
        assert_eq!(mime_type("svgz"), Some("image/svg+xml"));
        assert_eq!(mime_type("webp"), Some("image/webp"));
    }

    #[test]
    fn mime_lookup_normalizes_case_and_dot() {
        assert_eq!(mime_type(".JPG"), Some("image/jpeg"));
        assert_eq!(mime_type("Png"), Some("image/png"));
    }

    #[test]
    fn unknown_extension_has_no_type() {
        assert_eq!(mime_type("xyz"), None);
        assert_eq!(mime_type(""), None);

        let mut img = image("a.xyz", 100, 100);
        img.extension = "xyz".into();
        let sources = build_main_sources(&img, &[], false);
        assert_eq!(sources[0].mime_type, None);
        let json = serde_json::to_value(&sources[0]).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn source_entry_scales_aspect_ratio() {
        let entry = SourceEntry::new("a.jpg 1x", 1.5, None, None);
        assert_eq!(entry.aspect_ratio, 150.0);
    }

    #[test]
    fn source_entry_omits_empty_fields() {
        let entry = SourceEntry::new("", 1.0, None, Some(""));
        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("aspectRatio"));
    }

    #[test]
    fn main_sources_without_webp_are_native_only() {
        let sources = build_main_sources(
            &image("default.jpg", 1600, 900),
            &[
                art_source("(max-width: 600px)", image("mobile.png", 600, 600)),
                art_source("(max-width: 1200px)", image("tablet.jpg", 1200, 800)),
            ],
            false,
        );
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].media_query.as_deref(), Some("(max-width: 600px)"));
        assert_eq!(sources[0].mime_type, Some("image/png"));
        assert_eq!(sources[1].media_query.as_deref(), Some("(max-width: 1200px)"));
        assert_eq!(sources[2].media_query, None);
        assert!(sources.iter().all(|s| s.mime_type != Some("image/webp")));
    }

    #[test]
    fn main_sources_interleave_webp_after_each_native_entry() {
        let sources = build_main_sources(
            &image("default.jpg", 1600, 900),
            &[
                art_source("(max-width: 600px)", image("mobile.png", 600, 600)),
                art_source("(max-width: 1200px)", image("tablet.jpg", 1200, 800)),
            ],
            true,
        );
        let kinds: Vec<_> = sources
            .iter()
            .map(|s| (s.media_query.as_deref(), s.mime_type))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (Some("(max-width: 600px)"), Some("image/png")),
                (Some("(max-width: 600px)"), Some("image/webp")),
                (Some("(max-width: 1200px)"), Some("image/jpeg")),
                (Some("(max-width: 1200px)"), Some("image/webp")),
                (None, Some("image/jpeg")),
                (None, Some("image/webp")),
            ]
        );
        assert_eq!(sources[1].srcset, "mobile.webp 1x");
        assert_eq!(sources[5].srcset, "default.webp 1x");
    }

    #[test]
    fn webp_entry_falls_back_to_native_srcset() {
        let mut img = image("a.jpg", 800, 400);
        img.src_set_webp = None;
        let sources = build_main_sources(&img, &[], true);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].srcset, "a.jpg 1x");
        assert_eq!(sources[1].mime_type, Some("image/webp"));
    }

    #[test]
    fn placeholder_sources_are_gif_at_1x() {
        let sources = build_placeholder_sources(&[art_source(
            "(max-width: 600px)",
            image("mobile.jpg", 600, 300),
        )]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].srcset, "data:mobile.jpg 1x");
        assert_eq!(sources[0].mime_type, Some("image/gif"));
        assert_eq!(sources[0].aspect_ratio, 200.0);
        assert_eq!(sources[0].media_query.as_deref(), Some("(max-width: 600px)"));
    }

    #[test]
    fn placeholder_sources_skip_breakpoints_without_payload() {
        let mut bare = image("tablet.jpg", 1200, 800);
        bare.lqip_base64 = None;
        let sources = build_placeholder_sources(&[
            art_source("(max-width: 600px)", image("mobile.jpg", 600, 300)),
            art_source("(max-width: 1200px)", bare),
        ]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].media_query.as_deref(), Some("(max-width: 600px)"));
    }
}
