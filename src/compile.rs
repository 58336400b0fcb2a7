//! Descriptor → render bundle compilation.
//!
//! [`ImageCompiler`] turns a [`RawImageDescriptor`] plus per-call
//! [`CompileOverrides`] into a [`RenderBundle`] that a `<picture>` renderer
//! can consume without further decisions.
//!
//! ## Precedence
//!
//! Every resolved attribute follows the same order, first available wins:
//!
//! ```text
//! override  →  descriptor  →  ImageConfig  →  computed default
//! ```
//!
//! | Attribute | Descriptor | Config | Computed default |
//! |---|---|---|---|
//! | `backgroundColor` | – | `background_color` | – |
//! | `layout` | `layout` | – | `fullWidth` |
//! | `loading` | – | – | `lazy` |
//! | `lqip` | – | `lqip` | – |
//! | `sizes` | `sizes` | – | from layout and width |
//! | `width` / `height` | natural image size | – | – |
//!
//! ## Sparse output
//!
//! Optional bundle fields are `Option`s (or empty lists) and are skipped on
//! serialization. A renderer treats an absent field as "use the tag default".
//!
//! Compilation is pure: the compiler holds only immutable configuration and
//! can be shared freely across threads.

use crate::config::ImageConfig;
use crate::sources::{SourceEntry, build_main_sources, build_placeholder_sources};
use crate::styles::ImageStyles;
use crate::types::{CompileOverrides, ImageData, Layout, Loading, RawImageDescriptor};
use serde::Serialize;
use thiserror::Error;

/// Class present on every wrapper element.
pub const WRAPPER_CLASS: &str = "twill-image-wrapper";
/// Modifier class added for the constrained layout.
pub const WRAPPER_CONSTRAINED_CLASS: &str = "twill-image-wrapper-constrained";

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("descriptor is missing required field `{field}`")]
    MissingField { field: String },
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("descriptor JSON error: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// Render-ready attributes for one responsive image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Aspect ratio of the default image (width / height)
    pub aspect_ratio: f64,
    pub height: u32,
    pub width: u32,
    pub layout: Layout,
    pub loading: Loading,
    /// `true` when the image is visible without waiting for a load event.
    /// Always serialized: `false` tells the renderer to defer the reveal.
    pub should_load: bool,
    pub main_src: String,
    /// `<source>` candidates, default image last
    pub main_sources: Vec<SourceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_sources: Option<Vec<SourceEntry>>,
    pub main_style: String,
    pub placeholder_style: String,
    pub wrapper_style: String,
    pub wrapper_classes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

/// Attributes after applying the precedence rules.
#[derive(Debug)]
struct ResolvedAttributes {
    background_color: String,
    layout: Layout,
    loading: Loading,
    lqip: bool,
    sizes: Option<String>,
    wrapper_class: Option<String>,
    width: u32,
    height: u32,
}

/// Compiles descriptors against a fixed global configuration.
#[derive(Debug, Clone, Default)]
pub struct ImageCompiler {
    config: ImageConfig,
}

impl ImageCompiler {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Compile a descriptor into a render bundle.
    ///
    /// Fails fast when the descriptor lacks a `src`, has zero dimensions, or
    /// carries a non-positive aspect ratio. Everything optional falls back
    /// silently.
    pub fn compile(
        &self,
        descriptor: &RawImageDescriptor,
        overrides: &CompileOverrides,
    ) -> Result<RenderBundle, CompileError> {
        validate_descriptor(descriptor)?;
        validate_overrides(overrides)?;

        let attrs = self.resolve_attributes(descriptor, overrides);
        let image = &descriptor.image;

        let main_sources =
            build_main_sources(image, &descriptor.sources, self.config.webp_support);

        let (placeholder_src, placeholder_sources) = if attrs.lqip {
            let src = non_empty(image.lqip_base64.as_deref());
            let sources = if descriptor.sources.is_empty() {
                None
            } else {
                Some(build_placeholder_sources(&descriptor.sources)).filter(|s| !s.is_empty())
            };
            (src, sources)
        } else {
            (None, None)
        };

        let styles = ImageStyles::new(
            attrs.layout.clone(),
            attrs.background_color.as_str(),
            attrs.width,
            attrs.height,
        )
        .resolve(attrs.loading);

        let wrapper_classes = wrapper_classes(&attrs.layout, attrs.wrapper_class.as_deref());

        tracing::debug!(
            src = %image.src,
            layout = %attrs.layout,
            loading = %attrs.loading,
            sources = main_sources.len(),
            lqip = placeholder_src.is_some(),
            "compiled image"
        );

        Ok(RenderBundle {
            alt: non_empty(Some(image.alt.as_str())),
            aspect_ratio: image.aspect_ratio,
            height: attrs.height,
            width: attrs.width,
            should_load: attrs.loading == Loading::Eager,
            layout: attrs.layout,
            loading: attrs.loading,
            main_src: image.src.clone(),
            main_sources,
            placeholder_src,
            placeholder_sources,
            main_style: styles.main,
            placeholder_style: styles.placeholder,
            wrapper_style: styles.wrapper,
            wrapper_classes,
            sizes: attrs.sizes,
        })
    }

    fn resolve_attributes(
        &self,
        descriptor: &RawImageDescriptor,
        overrides: &CompileOverrides,
    ) -> ResolvedAttributes {
        let image = &descriptor.image;

        let background_color = overrides
            .background_color
            .clone()
            .unwrap_or_else(|| self.config.background_color.clone());

        let layout = overrides
            .layout
            .clone()
            .or_else(|| descriptor.layout.clone())
            .unwrap_or_default();

        let loading = overrides.loading.unwrap_or_default();
        let lqip = overrides.lqip.unwrap_or(self.config.lqip);

        // Each dimension resolves on its own: overriding only the width keeps
        // the natural height.
        let width = overrides.width.unwrap_or(image.width);
        let height = overrides.height.unwrap_or(image.height);

        let sizes = non_blank(overrides.sizes.as_deref())
            .or_else(|| non_blank(descriptor.sizes.as_deref()))
            .or_else(|| default_sizes(&layout, width));

        let wrapper_class = non_empty(overrides.class.as_deref().map(str::trim));

        ResolvedAttributes {
            background_color,
            layout,
            loading,
            lqip,
            sizes,
            wrapper_class,
            width,
            height,
        }
    }
}

/// Parse a descriptor from the JSON produced by the asset layer.
pub fn parse_descriptor(json: &str) -> Result<RawImageDescriptor, CompileError> {
    let descriptor: RawImageDescriptor = serde_json::from_str(json)?;
    validate_descriptor(&descriptor)?;
    Ok(descriptor)
}

/// Check the fields the compiler cannot substitute.
pub fn validate_descriptor(descriptor: &RawImageDescriptor) -> Result<(), CompileError> {
    let image = &descriptor.image;
    if image.src.trim().is_empty() {
        return Err(CompileError::MissingField {
            field: "image.src".into(),
        });
    }
    validate_dimensions(image, "image")?;

    for (i, source) in descriptor.sources.iter().enumerate() {
        check_aspect_ratio(source.image.aspect_ratio, &format!("sources[{i}].image"))?;
    }
    Ok(())
}

/// Dimension overrides replace the natural size, so they obey the same rule.
fn validate_overrides(overrides: &CompileOverrides) -> Result<(), CompileError> {
    let dimensions = [
        ("overrides.width", overrides.width),
        ("overrides.height", overrides.height),
    ];
    for (field, value) in dimensions {
        if value == Some(0) {
            return Err(CompileError::InvalidField {
                field: field.into(),
                reason: "must be greater than zero".into(),
            });
        }
    }
    Ok(())
}

fn validate_dimensions(image: &ImageData, path: &str) -> Result<(), CompileError> {
    if image.width == 0 {
        return Err(CompileError::InvalidField {
            field: format!("{path}.width"),
            reason: "must be greater than zero".into(),
        });
    }
    if image.height == 0 {
        return Err(CompileError::InvalidField {
            field: format!("{path}.height"),
            reason: "must be greater than zero".into(),
        });
    }
    check_aspect_ratio(image.aspect_ratio, path)
}

fn check_aspect_ratio(ratio: f64, path: &str) -> Result<(), CompileError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(CompileError::InvalidField {
            field: format!("{path}.aspectRatio"),
            reason: format!("must be a positive number, got {ratio}"),
        });
    }
    Ok(())
}

/// Default `sizes` attribute for a layout, `None` for unknown layouts.
pub fn default_sizes(layout: &Layout, width: u32) -> Option<String> {
    match layout {
        Layout::Constrained => Some(format!("(min-width:{width}px) {width}px, 100vw")),
        Layout::Fixed => Some(format!("{width}px")),
        Layout::FullWidth => Some("100vw".to_string()),
        Layout::Other(name) => {
            tracing::debug!(layout = %name, "unknown layout, no default sizes");
            None
        }
    }
}

/// Wrapper element classes: base, layout modifier, then the caller's class.
pub fn wrapper_classes(layout: &Layout, extra: Option<&str>) -> String {
    let mut classes = vec![WRAPPER_CLASS];
    if *layout == Layout::Constrained {
        classes.push(WRAPPER_CONSTRAINED_CLASS);
    }
    if let Some(extra) = extra {
        classes.push(extra);
    }
    classes.join(" ")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    non_empty(value.filter(|v| !v.trim().is_empty()))
}
