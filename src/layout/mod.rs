//! Layout documents: clamped component lists ready for rendering.
//!
//! A [`LayoutDocument`] is built from extracted components and a canvas
//! size. The JSON form carries a derived `style` per component; it is
//! recomputed from `type` on read, so a hand-edited style never sticks.

mod html;
mod style;

pub use html::{render_html, write_html};
pub use style::Style;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::SeguiError;
use crate::model::{BoundingBox, Component};

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A canvas plus the components laid out on it.
///
/// Every component box produced by [`build`] fits within the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LayoutDocument {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Path or URL of the screenshot shown behind the components.
    #[serde(rename = "background", default)]
    pub background_reference: Option<String>,
    pub components: Vec<Component>,
}

impl LayoutDocument {
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    /// Returns true if every component lies inside the canvas.
    pub fn is_within_canvas(&self) -> bool {
        self.components
            .iter()
            .all(|c| c.bbox.fits_within(self.canvas_width, self.canvas_height))
    }
}

/// Clamps `components` onto `canvas` and wraps them in a document.
///
/// Order is preserved. Out-of-range positions are pulled inside the canvas
/// and sizes shrunk to fit, never below one pixel.
///
/// # Errors
/// Returns [`SeguiError::InvalidShape`] for a zero-sized canvas.
pub fn build(
    components: Vec<Component>,
    canvas: CanvasSize,
    background_reference: Option<String>,
) -> Result<LayoutDocument, SeguiError> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(SeguiError::invalid_shape(format!(
            "canvas is {}x{}",
            canvas.width, canvas.height
        )));
    }

    let components = components
        .into_iter()
        .map(|mut component| {
            let clamped = component.bbox.clamp_to(canvas.width, canvas.height);
            if clamped != component.bbox {
                tracing::debug!(
                    kind = %component.kind,
                    before = ?component.bbox,
                    after = ?clamped,
                    "clamped component to canvas"
                );
            }
            component.bbox = clamped;
            component
        })
        .collect();

    Ok(LayoutDocument {
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        background_reference,
        components,
    })
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    canvas_width: u32,
    canvas_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<&'a str>,
    components: Vec<ComponentOut<'a>>,
}

#[derive(Serialize)]
struct ComponentOut<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    class_id: u32,
    bbox: BoundingBox,
    style: Style,
}

impl Serialize for LayoutDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentOut {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            background: self.background_reference.as_deref(),
            components: self
                .components
                .iter()
                .map(|c| ComponentOut {
                    kind: &c.kind,
                    class_id: c.class_id,
                    bbox: c.bbox,
                    style: Style::for_type(&c.kind),
                })
                .collect(),
        }
        .serialize(serializer)
    }
}

/// Serializes a layout to pretty-printed JSON.
pub fn to_json_string(document: &LayoutDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Parses a layout from JSON. Unknown fields, including `style`, are ignored.
pub fn from_json_str(json: &str) -> Result<LayoutDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a layout document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_layout_json(path: &Path) -> Result<LayoutDocument, SeguiError> {
    let file = File::open(path).map_err(SeguiError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SeguiError::LayoutJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a layout document to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_layout_json(path: &Path, document: &LayoutDocument) -> Result<(), SeguiError> {
    let file = File::create(path).map_err(SeguiError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(|source| SeguiError::LayoutJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}
