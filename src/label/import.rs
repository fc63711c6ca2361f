//! Bounds annotations: labelled element rectangles, as found in
//! RICO-style screen dumps.
//!
//! ```json
//! {"bounds": [{"class": "Button", "bounds": [10, 20, 110, 60]}]}
//! ```
//!
//! Class ids are assigned in order of first appearance starting at 1, so
//! [`BoundsAnnotation::class_names`] can be used directly as a class list.
//! A box whose last pair exceeds its first pair is read as corner
//! coordinates, anything else as origin plus size.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::SeguiError;
use crate::model::{BoundingBox, Component, IGNORE_INDEX};

/// Boxes and the class list discovered while reading them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundsAnnotation {
    /// Name of class `k` is `class_names[k - 1]`.
    pub class_names: Vec<String>,
    pub components: Vec<Component>,
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    #[serde(default)]
    bounds: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    bounds: Option<Vec<f64>>,
}

/// Reads a bounds annotation file.
pub fn read_bounds_json(path: &Path) -> Result<BoundsAnnotation, SeguiError> {
    let file = File::open(path).map_err(SeguiError::Io)?;
    let raw: RawAnnotation = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        SeguiError::AnnotationJsonParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    convert(raw)
}

/// Parses a bounds annotation from a JSON string.
pub fn parse_bounds_json(json: &str) -> Result<BoundsAnnotation, SeguiError> {
    let raw: RawAnnotation =
        serde_json::from_str(json).map_err(|source| SeguiError::AnnotationJsonParse {
            path: "<string>".into(),
            source,
        })?;
    convert(raw)
}

fn convert(raw: RawAnnotation) -> Result<BoundsAnnotation, SeguiError> {
    let mut annotation = BoundsAnnotation::default();

    for element in raw.bounds {
        // elements without a class carry no label
        let Some(class) = element.class else {
            continue;
        };
        let class_id = match annotation.class_names.iter().position(|n| *n == class) {
            Some(index) => index + 1,
            None => {
                if annotation.class_names.len() + 1 >= IGNORE_INDEX as usize {
                    return Err(SeguiError::configuration(format!(
                        "more than {} distinct classes in bounds annotation",
                        IGNORE_INDEX - 1
                    )));
                }
                annotation.class_names.push(class.clone());
                annotation.class_names.len()
            }
        };

        let Some(&[a, b, c, d]) = element.bounds.as_deref() else {
            continue;
        };
        let bbox = if c > a && d > b {
            corners_to_box(a, b, c, d)
        } else {
            corners_to_box(a, b, a + c, b + d)
        };
        annotation
            .components
            .push(Component::new(class, bbox, class_id as u32));
    }

    Ok(annotation)
}

/// Coordinates are truncated toward zero before the size is taken.
fn corners_to_box(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> BoundingBox {
    let (x0, y0) = (x_min as i64, y_min as i64);
    BoundingBox::new(
        x0,
        y0,
        (x_max as i64).saturating_sub(x0),
        (y_max as i64).saturating_sub(y0),
    )
}
