//! Fault-tolerant image decoding.
//!
//! [`load`] runs an ordered list of decode strategies and returns the first
//! usable buffer. Every failed step is kept, so a total failure reports the
//! whole chain rather than only the last error:
//!
//! 1. extension-driven decode straight from the path,
//! 2. read the bytes first, then decode from memory by content sniffing
//!    (immune to path encoding quirks),
//! 3. the `png` crate as a secondary decoder.
//!
//! [`ColorMode::Palette`] skips the first two and asks the `png` crate for
//! raw palette indices, which is how label maps are stored.

mod strategy;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{DecodeAttempts, SeguiError};
use crate::model::LabelMap;
use crate::report::{Issue, IssueCode, IssueContext, Reporter};

/// Requested channel layout of a decoded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    #[default]
    Rgb,
    Bgr,
    Grayscale,
    /// Raw indices of an indexed-color (or 8-bit greyscale) PNG.
    Palette,
}

impl ColorMode {
    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb | ColorMode::Bgr => 3,
            ColorMode::Grayscale | ColorMode::Palette => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Rgb => "rgb",
            ColorMode::Bgr => "bgr",
            ColorMode::Grayscale => "gray",
            ColorMode::Palette => "palette",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = SeguiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorMode::Rgb),
            "bgr" => Ok(ColorMode::Bgr),
            "gray" | "grey" | "grayscale" | "l" => Ok(ColorMode::Grayscale),
            "palette" | "p" => Ok(ColorMode::Palette),
            other => Err(SeguiError::UnsupportedFormat(format!(
                "color mode '{}' (supported: rgb, bgr, gray, palette)",
                other
            ))),
        }
    }
}

/// Where the encoded image comes from.
#[derive(Clone, Copy, Debug)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl ImageSource<'_> {
    /// Path used in diagnostics; `<memory>` for byte input.
    pub fn display_path(&self) -> PathBuf {
        match self {
            ImageSource::Path(path) => path.to_path_buf(),
            ImageSource::Bytes(_) => PathBuf::from("<memory>"),
        }
    }

    fn context(&self) -> IssueContext {
        match self {
            ImageSource::Path(path) => IssueContext::file(path),
            ImageSource::Bytes(_) => IssueContext::Memory,
        }
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// A decoded image: interleaved 8-bit samples in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channel_order: ColorMode,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_raw(
        width: u32,
        height: u32,
        channel_order: ColorMode,
        data: Vec<u8>,
    ) -> Result<Self, SeguiError> {
        let expected = width as usize * height as usize * channel_order.channels();
        if data.len() != expected {
            return Err(SeguiError::invalid_shape(format!(
                "{}x{} {} buffer needs {} samples, got {}",
                width,
                height,
                channel_order,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channel_order,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channel_order(&self) -> ColorMode {
        self.channel_order
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channel_order.channels()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        &self.data[start..start + c]
    }

    /// Reinterprets a single-channel buffer as a label map.
    pub fn into_label_map(self) -> Result<LabelMap, SeguiError> {
        if self.channels() != 1 {
            return Err(SeguiError::invalid_shape(format!(
                "cannot use a {}-channel {} image as a label map",
                self.channels(),
                self.channel_order
            )));
        }
        LabelMap::from_raw(self.width, self.height, self.data)
    }
}

/// Decodes an image, trying each strategy in order until one succeeds.
///
/// The call is all-or-nothing: either a buffer whose size matches the
/// image and whose channel order matches `mode`, or
/// [`SeguiError::Decode`] carrying every failed step.
pub fn load<R: Reporter + ?Sized>(
    source: ImageSource<'_>,
    mode: ColorMode,
    reporter: &mut R,
) -> Result<PixelBuffer, SeguiError> {
    let strategies = strategy::plan(&source, mode);
    let mut attempts = DecodeAttempts::default();

    for (index, &(decode, description)) in strategies.iter().enumerate() {
        match decode(&source, mode) {
            Ok(buffer) if buffer.width() > 0 && buffer.height() > 0 => {
                tracing::debug!(
                    path = %source.display_path().display(),
                    strategy = description,
                    width = buffer.width(),
                    height = buffer.height(),
                    "decoded image"
                );
                return Ok(buffer);
            }
            Ok(_) => attempts.push(description, "decoder returned an empty image"),
            Err(message) => attempts.push(description, message),
        }

        if let Some((_, next)) = strategies.get(index + 1) {
            reporter.report(Issue::info(
                IssueCode::DecodeFallback,
                format!("{} failed, trying {}", description, next),
                source.context(),
            ));
        }
    }

    reporter.report(Issue::error(
        IssueCode::DecodeFailed,
        format!("all decode strategies failed: {}", attempts),
        source.context(),
    ));
    Err(SeguiError::Decode {
        path: source.display_path(),
        attempts,
    })
}

/// Shorthand for [`load`] on a filesystem path.
pub fn load_path<R: Reporter + ?Sized>(
    path: &Path,
    mode: ColorMode,
    reporter: &mut R,
) -> Result<PixelBuffer, SeguiError> {
    load(ImageSource::Path(path), mode, reporter)
}
