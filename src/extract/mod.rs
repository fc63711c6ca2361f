//! Connected-component extraction of typed UI regions.
//!
//! For each class present in a label map (ascending, background skipped),
//! same-class pixels are grouped with 8-connectivity and every group becomes
//! one bounding box. Region labels come from `imageproc` in raster order of
//! first occurrence, so the output order is fixed by the input alone:
//! class index ascending, then region label ascending.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::error::SeguiError;
use crate::model::{BoundingBox, Component, LabelMap, BACKGROUND_INDEX};

/// Noise-suppression thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_width: 5,
            min_height: 5,
        }
    }
}

/// Extracts components with the default 5x5 size filter.
pub fn extract(labels: &LabelMap, class_names: &[String]) -> Result<Vec<Component>, SeguiError> {
    extract_with_options(labels, class_names, &ExtractOptions::default())
}

/// Extracts one [`Component`] per connected same-class region.
///
/// Regions narrower than `min_width` or shorter than `min_height` are
/// dropped. A map with only background yields an empty list.
///
/// # Errors
/// Returns [`SeguiError::InvalidShape`] if the map has no pixels.
pub fn extract_with_options(
    labels: &LabelMap,
    class_names: &[String],
    options: &ExtractOptions,
) -> Result<Vec<Component>, SeguiError> {
    if labels.is_empty() {
        return Err(SeguiError::invalid_shape(format!(
            "label map is {}x{}",
            labels.width(),
            labels.height()
        )));
    }

    let mut components = Vec::new();
    for class_index in labels.distinct_values() {
        if class_index == BACKGROUND_INDEX {
            continue;
        }

        let kind = type_name(class_names, class_index);
        for bbox in class_regions(labels, class_index) {
            if bbox.width < options.min_width as i64 || bbox.height < options.min_height as i64 {
                continue;
            }
            components.push(Component::new(kind.clone(), bbox, class_index as u32));
        }
    }

    tracing::debug!(
        width = labels.width(),
        height = labels.height(),
        components = components.len(),
        "extracted components"
    );
    Ok(components)
}

/// Resolves the display name of a class.
///
/// Class indices are 1-based relative to `class_names`: index `k` names
/// `class_names[k - 1]`, since index 0 is background and has no entry.
/// Indices without a name become `class_<k>`.
pub fn type_name(class_names: &[String], class_index: u8) -> String {
    (class_index as usize)
        .checked_sub(1)
        .and_then(|i| class_names.get(i))
        .cloned()
        .unwrap_or_else(|| format!("class_{}", class_index))
}

/// Bounding boxes of every 8-connected region of `class_index`, in
/// ascending region-label order.
fn class_regions(labels: &LabelMap, class_index: u8) -> Vec<BoundingBox> {
    let source = labels.as_gray();
    let mask = GrayImage::from_fn(source.width(), source.height(), |x, y| {
        if source.get_pixel(x, y)[0] == class_index {
            Luma([1u8])
        } else {
            Luma([0u8])
        }
    });

    let regions = connected_components(&mask, Connectivity::Eight, Luma([0u8]));

    // (min_x, min_y, max_x, max_y), indexed by region label - 1
    let mut extents: Vec<Option<(u32, u32, u32, u32)>> = Vec::new();
    for (x, y, label) in regions.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        if extents.len() < label {
            extents.resize(label, None);
        }
        let slot = &mut extents[label - 1];
        *slot = Some(match *slot {
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
            None => (x, y, x, y),
        });
    }

    extents
        .into_iter()
        .flatten()
        .map(|(min_x, min_y, max_x, max_y)| BoundingBox::from_inclusive(min_x, min_y, max_x, max_y))
        .collect()
}
