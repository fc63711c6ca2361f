//! Turns indexed records into decoded training samples.

use crate::error::SeguiError;
use crate::ingest::{self, ColorMode, PixelBuffer};
use crate::label::LabelTransform;
use crate::model::LabelMap;
use crate::report::Reporter;

use super::SampleRecord;

/// A decoded image with its transformed label map.
#[derive(Clone, Debug)]
pub struct Sample {
    pub image: PixelBuffer,
    /// Label map after the configured transform.
    pub label: LabelMap,
    /// Label map exactly as decoded, for evaluation against raw targets.
    pub original_label: LabelMap,
}

/// Loads [`SampleRecord`]s with a fixed image mode and label transform.
#[derive(Clone, Debug, Default)]
pub struct SampleLoader {
    pub image_mode: ColorMode,
    pub transform: LabelTransform,
}

impl SampleLoader {
    pub fn new(image_mode: ColorMode, transform: LabelTransform) -> Self {
        Self {
            image_mode,
            transform,
        }
    }

    /// Decodes one record.
    ///
    /// Every indexed record is expected to load, so decode failures are
    /// returned rather than skipped. Image and label must share a size.
    pub fn load<R: Reporter + ?Sized>(
        &self,
        record: &SampleRecord,
        reporter: &mut R,
    ) -> Result<Sample, SeguiError> {
        let image = ingest::load_path(&record.image_path, self.image_mode, reporter)?;
        let original_label =
            ingest::load_path(&record.label_path, ColorMode::Palette, reporter)?.into_label_map()?;

        if (image.width(), image.height()) != (original_label.width(), original_label.height()) {
            return Err(SeguiError::invalid_shape(format!(
                "image {} is {}x{} but label {} is {}x{}",
                record.image_path.display(),
                image.width(),
                image.height(),
                record.label_path.display(),
                original_label.width(),
                original_label.height()
            )));
        }

        let label = self.transform.apply(&original_label);
        Ok(Sample {
            image,
            label,
            original_label,
        })
    }
}
