//! Input types shared by the compiler, the CLI and the tests.
//!
//! Descriptors arrive as camelCase JSON from the asset layer, so every type
//! here deserializes with `rename_all = "camelCase"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout strategy for a rendered image.
///
/// Unrecognized values are kept verbatim in [`Layout::Other`]: they still get
/// styles and classes but no default `sizes` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Layout {
    /// Stretch to the full width of the container.
    #[default]
    FullWidth,
    /// Fluid up to the image width, never wider.
    Constrained,
    /// Exact pixel width and height.
    Fixed,
    Other(String),
}

impl Layout {
    pub fn as_str(&self) -> &str {
        match self {
            Layout::FullWidth => "fullWidth",
            Layout::Constrained => "constrained",
            Layout::Fixed => "fixed",
            Layout::Other(name) => name,
        }
    }
}

impl From<String> for Layout {
    fn from(value: String) -> Self {
        match value.as_str() {
            "fullWidth" => Layout::FullWidth,
            "constrained" => Layout::Constrained,
            "fixed" => Layout::Fixed,
            _ => Layout::Other(value),
        }
    }
}

impl From<&str> for Layout {
    fn from(value: &str) -> Self {
        Layout::from(value.to_string())
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `<img loading>` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    #[default]
    Lazy,
    Eager,
}

impl Loading {
    pub fn as_str(self) -> &'static str {
        match self {
            Loading::Lazy => "lazy",
            Loading::Eager => "eager",
        }
    }
}

impl fmt::Display for Loading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single image variant with precomputed URLs and dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Fallback URL for the `<img src>` attribute
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// Width divided by height
    pub aspect_ratio: f64,
    /// Srcset in the image's native format
    pub src_set: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_set_webp: Option<String>,
    /// File extension of the native format, without the dot
    pub extension: String,
    /// Inline data URI of the low-quality placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lqip_base64: Option<String>,
}

/// Art-direction variant selected by a media query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtDirectionSource {
    pub media_query: String,
    pub image: ImageData,
}

/// Raw descriptor handed over by the asset/content layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageDescriptor {
    pub image: ImageData,
    /// Art-direction variants, in the order the browser should test them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ArtDirectionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

/// Per-call frontend options. Every field wins over descriptor and config values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompileOverrides {
    pub background_color: Option<String>,
    pub layout: Option<Layout>,
    pub loading: Option<Loading>,
    pub lqip: Option<bool>,
    pub sizes: Option<String>,
    /// Extra class appended to the wrapper element
    pub class: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
