//! # twill-image
//!
//! Compiles a raw responsive-image descriptor into the attribute bundle a
//! `<picture>` renderer needs: ordered `<source>` candidates, a fallback
//! `src`, a `sizes` hint, low-quality placeholders, and inline styles that
//! reserve the image box before anything loads.
//!
//! # Pipeline
//!
//! ```text
//! RawImageDescriptor ─┐
//! CompileOverrides  ──┼─▶ ImageCompiler::compile ─▶ ImageStyles ─▶ RenderBundle ─▶ renderer
//! ImageConfig       ──┘
//! ```
//!
//! The compiler never touches pixels or URLs. The asset layer has already
//! resized, encoded and uploaded every variant; this crate decides how those
//! variants are presented.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compile`] | Attribute precedence, sizes defaults, wrapper classes, bundle assembly |
//! | [`sources`] | `<source>` ordering, WebP fallbacks, placeholder sources, MIME lookup |
//! | [`styles`] | Wrapper / main / placeholder inline styles per layout |
//! | [`config`] | `twill-image.toml` loading, layering and validation |
//! | [`types`] | Descriptor, overrides, `Layout` and `Loading` |
//! | [`output`] | Human-readable CLI summaries |
//!
//! # Design Decisions
//!
//! ## Explicit Configuration
//!
//! Global defaults live in an [`ImageConfig`] handed to
//! [`ImageCompiler::new`]. Compilation reads nothing ambient, so the same
//! descriptor and overrides always produce the same bundle, on any thread.
//!
//! ## Sparse Bundles
//!
//! Optional bundle fields are `Option`s and disappear from the serialized
//! JSON when empty. Renderers treat absence as "use the tag default".
//!
//! ## Source Order Is the Contract
//!
//! Browsers take the first matching `<source>`. Each art-direction
//! breakpoint is immediately followed by its WebP fallback, and the
//! unconditional default image always comes last.
//!
//! # Example
//!
//! ```
//! use twill_image::{CompileOverrides, ImageCompiler, ImageConfig, Layout, parse_descriptor};
//!
//! let descriptor = parse_descriptor(r#"{
//!     "image": {
//!         "src": "a.jpg", "alt": "", "width": 800, "height": 400,
//!         "aspectRatio": 2.0, "srcSet": "a.jpg 1x", "extension": "jpg"
//!     }
//! }"#).unwrap();
//!
//! let compiler = ImageCompiler::new(ImageConfig { webp_support: true, ..ImageConfig::default() });
//! let overrides = CompileOverrides { layout: Some(Layout::Constrained), ..Default::default() };
//! let bundle = compiler.compile(&descriptor, &overrides).unwrap();
//!
//! assert_eq!(bundle.main_sources.len(), 2);
//! assert_eq!(bundle.sizes.as_deref(), Some("(min-width:800px) 800px, 100vw"));
//! ```

pub mod compile;
pub mod config;
pub mod output;
pub mod sources;
pub mod styles;
pub mod types;

pub use compile::{CompileError, ImageCompiler, RenderBundle, parse_descriptor};
pub use config::{ConfigError, ImageConfig};
pub use sources::SourceEntry;
pub use styles::{ImageStyles, ResolvedStyles};
pub use types::{ArtDirectionSource, CompileOverrides, ImageData, Layout, Loading, RawImageDescriptor};

#[cfg(test)]
pub(crate) mod test_helpers;
