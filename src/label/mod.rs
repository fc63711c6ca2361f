//! Label space transforms for training data.
//!
//! Two per-pixel transforms, applied in a fixed order when combined:
//!
//! 1. [`remap`]: explicit class-ID remapping through a [`ClassMapping`].
//! 2. [`reduce_zero_label`]: collapse an unused background index 0 into the
//!    ignore sentinel and shift every other value down by one.
//!
//! Bounds annotations can be painted into masks with [`rasterize`] after
//! [`read_bounds_json`].
//!
//! Both transforms read their input and return a fresh [`LabelMap`], so a map shared
//! with other consumers is never modified.

mod import;
mod mapping;
mod rasterize;
mod transform;

pub use import::{parse_bounds_json, read_bounds_json, BoundsAnnotation};
pub use mapping::ClassMapping;
pub use rasterize::rasterize;
pub use transform::{reduce_zero_label, remap, LabelTransform};
