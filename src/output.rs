//! CLI output formatting for compiled bundles and descriptor checks.
//!
//! The JSON bundle is what renderers consume; this module produces the
//! human-readable view printed by `compile --summary` and `check`.
//!
//! # Output Format
//!
//! ## Compile summary
//!
//! ```text
//! Image hero.jpg
//!     Alt: Harbour at dusk
//!     Layout: constrained 1600x900 (ratio 1.7778)
//!     Loading: lazy
//!     Sizes: (min-width:1600px) 1600px, 100vw
//!     Classes: twill-image-wrapper twill-image-wrapper-constrained
//!
//! Sources
//! 001 (max-width: 600px) image/jpeg
//!     hero-mobile.jpg 600w
//! 002 default image/jpeg
//!     hero-800.jpg 800w, hero-1600.jpg 1600w
//!
//! Placeholder
//!     Src: data:image/gif;base64,R0lGODlhAQAB...
//! 001 (max-width: 600px) image/gif
//! ```
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::compile::RenderBundle;
use crate::sources::SourceEntry;
use crate::types::RawImageDescriptor;

/// Longest payload shown before truncation.
const MAX_VALUE_LEN: usize = 48;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Header line for a source: index, media query (or `default`), MIME type.
fn source_line(index: usize, source: &SourceEntry) -> String {
    format!(
        "{} {} {}",
        format_index(index),
        source.media_query.as_deref().unwrap_or("default"),
        source.mime_type.unwrap_or("(no type)")
    )
}

fn push_sources(lines: &mut Vec<String>, sources: &[SourceEntry]) {
    for (i, source) in sources.iter().enumerate() {
        lines.push(source_line(i + 1, source));
        if !source.srcset.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate(&source.srcset, MAX_VALUE_LEN)));
        }
    }
}

/// Format a compiled bundle.
pub fn format_bundle(bundle: &RenderBundle) -> Vec<String> {
    let mut lines = vec![format!("Image {}", bundle.main_src)];

    if let Some(alt) = &bundle.alt {
        lines.push(format!("{}Alt: {}", indent(1), alt));
    }
    lines.push(format!(
        "{}Layout: {} {}x{} (ratio {:.4})",
        indent(1),
        bundle.layout,
        bundle.width,
        bundle.height,
        bundle.aspect_ratio
    ));
    lines.push(format!("{}Loading: {}", indent(1), bundle.loading));
    if let Some(sizes) = &bundle.sizes {
        lines.push(format!("{}Sizes: {}", indent(1), sizes));
    }
    lines.push(format!("{}Classes: {}", indent(1), bundle.wrapper_classes));

    lines.push(String::new());
    lines.push("Sources".to_string());
    push_sources(&mut lines, &bundle.main_sources);

    if bundle.placeholder_src.is_some() || bundle.placeholder_sources.is_some() {
        lines.push(String::new());
        lines.push("Placeholder".to_string());
        if let Some(src) = &bundle.placeholder_src {
            lines.push(format!("{}Src: {}", indent(1), truncate(src, MAX_VALUE_LEN)));
        }
        if let Some(sources) = &bundle.placeholder_sources {
            push_sources(&mut lines, sources);
        }
    }

    lines
}

/// Print a compiled bundle to stdout.
pub fn print_bundle(bundle: &RenderBundle) {
    for line in format_bundle(bundle) {
        println!("{}", line);
    }
}

/// Format the result of checking a descriptor.
pub fn format_check(descriptor: &RawImageDescriptor) -> Vec<String> {
    let image = &descriptor.image;
    let mut lines = vec![format!(
        "Image {} ({}x{}, {})",
        image.src, image.width, image.height, image.extension
    )];

    if descriptor.sources.is_empty() {
        lines.push(format!("{}No art-direction sources", indent(1)));
    }
    for (i, source) in descriptor.sources.iter().enumerate() {
        lines.push(format!(
            "{}{} {} → {} ({}x{})",
            indent(1),
            format_index(i + 1),
            source.media_query,
            source.image.src,
            source.image.width,
            source.image.height
        ));
    }

    let with_lqip = std::iter::once(image)
        .chain(descriptor.sources.iter().map(|s| &s.image))
        .filter(|img| img.lqip_base64.as_deref().is_some_and(|s| !s.is_empty()))
        .count();
    lines.push(format!(
        "{}Placeholders: {} of {}",
        indent(1),
        with_lqip,
        descriptor.sources.len() + 1
    ));

    lines
}

/// Print a descriptor check to stdout.
pub fn print_check(descriptor: &RawImageDescriptor) {
    for line in format_check(descriptor) {
        println!("{}", line);
    }
}
