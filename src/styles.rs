//! Inline styles for the wrapper, main image and placeholder elements.
//!
//! The three strings are independent: a renderer can drop any of them into a
//! `style="..."` attribute on its own. Each one is built from an ordered list
//! of `(property, value)` declarations, so the same inputs always serialize
//! to the same bytes.
//!
//! ```text
//! wrapper      position:relative;overflow:hidden;width:100%;aspect-ratio:800 / 400;background-color:transparent;
//! placeholder  position:absolute;top:0;left:0;width:100%;height:100%;object-fit:cover;object-position:center center;
//! main         <placeholder overlay>transition:opacity 500ms linear;opacity:0;
//! ```

use crate::types::{Layout, Loading};

type Declarations = Vec<(&'static str, String)>;

/// Fade-in duration for lazily loaded images.
const FADE_IN: &str = "opacity 500ms linear";

/// All three styles for one image, resolved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyles {
    pub wrapper: String,
    pub main: String,
    pub placeholder: String,
}

/// Style resolver configured with the geometry of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStyles {
    layout: Layout,
    background_color: String,
    width: u32,
    height: u32,
}

impl ImageStyles {
    pub fn new(layout: Layout, background_color: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            layout,
            background_color: background_color.into(),
            width,
            height,
        }
    }

    /// Positioning context that reserves the image box before anything paints.
    pub fn wrapper(&self) -> String {
        let mut style: Declarations = vec![
            ("position", "relative".into()),
            ("overflow", "hidden".into()),
        ];

        match &self.layout {
            Layout::Fixed => {
                style.push(("display", "inline-block".into()));
                style.push(("vertical-align", "top".into()));
                style.push(("width", px(self.width)));
                style.push(("height", px(self.height)));
            }
            Layout::Constrained => {
                style.push(("display", "inline-block".into()));
                style.push(("vertical-align", "top".into()));
                style.push(("width", "100%".into()));
                style.push(("max-width", px(self.width)));
                style.push(("aspect-ratio", self.aspect_ratio()));
            }
            Layout::FullWidth => {
                style.push(("width", "100%".into()));
                style.push(("aspect-ratio", self.aspect_ratio()));
            }
            // Unknown layouts get no sizing; the container decides.
            Layout::Other(_) => {}
        }

        if !self.background_color.trim().is_empty() {
            style.push(("background-color", self.background_color.clone()));
        }

        serialize(&style)
    }

    /// Main `<img>` style. Lazy images stay transparent until the renderer
    /// flips opacity on the load event.
    pub fn main(&self, loading: Loading) -> String {
        let mut style = overlay();
        style.push(("transition", FADE_IN.into()));
        let opacity = match loading {
            Loading::Lazy => "0",
            Loading::Eager => "1",
        };
        style.push(("opacity", opacity.into()));
        serialize(&style)
    }

    /// Placeholder style, stacked exactly over the main image box.
    pub fn placeholder(&self) -> String {
        serialize(&overlay())
    }

    pub fn resolve(&self, loading: Loading) -> ResolvedStyles {
        ResolvedStyles {
            wrapper: self.wrapper(),
            main: self.main(loading),
            placeholder: self.placeholder(),
        }
    }

    fn aspect_ratio(&self) -> String {
        format!("{} / {}", self.width, self.height)
    }
}

fn px(value: u32) -> String {
    format!("{value}px")
}

fn overlay() -> Declarations {
    vec![
        ("position", "absolute".into()),
        ("top", "0".into()),
        ("left", "0".into()),
        ("width", "100%".into()),
        ("height", "100%".into()),
        ("object-fit", "cover".into()),
        ("object-position", "center center".into()),
    ]
}

fn serialize(style: &[(&'static str, String)]) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{property}:{value};"))
        .collect()
}
