//! Shared test utilities: compact builders for descriptors.
//!
//! Every builder derives the remaining fields from the file name so tests
//! only spell out what they assert on:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = image("hero.jpg", 1600, 900);
//! assert_eq!(img.src_set, "hero.jpg 1x");
//! assert_eq!(img.src_set_webp.as_deref(), Some("hero.webp 1x"));
//! assert_eq!(img.lqip_base64.as_deref(), Some("data:hero.jpg"));
//! ```

use crate::types::{ArtDirectionSource, ImageData, RawImageDescriptor};

/// Image variant whose srcsets, extension and LQIP payload derive from `src`.
pub fn image(src: &str, width: u32, height: u32) -> ImageData {
    let (stem, extension) = src.rsplit_once('.').unwrap_or((src, ""));
    ImageData {
        src: src.to_string(),
        alt: format!("alt for {src}"),
        width,
        height,
        aspect_ratio: width as f64 / height as f64,
        src_set: format!("{src} 1x"),
        src_set_webp: Some(format!("{stem}.webp 1x")),
        extension: extension.to_string(),
        lqip_base64: Some(format!("data:{src}")),
    }
}

/// Art-direction source for a media query.
pub fn art_source(media_query: &str, image: ImageData) -> ArtDirectionSource {
    ArtDirectionSource {
        media_query: media_query.to_string(),
        image,
    }
}

/// Descriptor with no art direction and no layout/sizes hints.
pub fn descriptor(image: ImageData) -> RawImageDescriptor {
    RawImageDescriptor {
        image,
        sources: Vec::new(),
        layout: None,
        sizes: None,
    }
}
