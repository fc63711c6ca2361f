//! Per-pixel class index maps.

use image::{GrayImage, Luma};

use crate::error::SeguiError;

/// Reserved value meaning "exclude this pixel from loss and metrics".
pub const IGNORE_INDEX: u8 = 255;

/// Class index treated as background by the extractor.
pub const BACKGROUND_INDEX: u8 = 0;

/// A 2-D map of 8-bit class indices.
///
/// Backed by an [`image::GrayImage`] so it can be fed straight into
/// `imageproc` and written out as a PNG. Zero-sized maps are allowed;
/// consumers that need pixels reject them with [`SeguiError::InvalidShape`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    pixels: GrayImage,
}

impl LabelMap {
    /// Creates a map of the given size filled with [`BACKGROUND_INDEX`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::new(width, height),
        }
    }

    /// Creates a map filled with a single value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            pixels: GrayImage::from_pixel(width, height, Luma([value])),
        }
    }

    /// Wraps row-major raw values.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SeguiError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SeguiError::invalid_shape(format!(
                "label map of {}x{} needs {} values, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        GrayImage::from_raw(width, height, data)
            .map(Self::from_gray)
            .ok_or_else(|| SeguiError::invalid_shape("label map buffer rejected"))
    }

    /// Builds a map from equally long rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, SeguiError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(SeguiError::invalid_shape(format!(
                    "row {} has {} values, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_raw(width as u32, height as u32, data)
    }

    pub fn from_gray(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns true when the map has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns the class index at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y)[0]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.pixels.put_pixel(x, y, Luma([value]));
    }

    /// Row-major view of every value.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn into_gray(self) -> GrayImage {
        self.pixels
    }

    /// Returns a new map with every value passed through `lut`.
    pub fn map_values(&self, lut: &[u8; 256]) -> LabelMap {
        let mut pixels = self.pixels.clone();
        for value in pixels.iter_mut() {
            *value = lut[*value as usize];
        }
        LabelMap { pixels }
    }

    /// Distinct values present in the map, ascending.
    pub fn distinct_values(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for &v in self.pixels.as_raw() {
            seen[v as usize] = true;
        }
        (0..=255u8).filter(|&v| seen[v as usize]).collect()
    }
}
