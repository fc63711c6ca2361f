//! Core data types shared by every stage.
//!
//! - [`LabelMap`]: per-pixel class indices, same extent as its image.
//! - [`BoundingBox`]: integer pixel rectangle in XYWH form.
//! - [`Component`]: one typed rectangular region found in a label map.
//!
//! Types here are permissive: a [`BoundingBox`] may hold negative or
//! oversized values so that producers other than the extractor can be
//! represented, and the layout builder clamps them before serialization.

mod bbox;
mod component;
mod label_map;

pub use bbox::BoundingBox;
pub use component::Component;
pub use label_map::{LabelMap, BACKGROUND_INDEX, IGNORE_INDEX};
