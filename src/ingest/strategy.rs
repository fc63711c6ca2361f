//! Individual decode strategies and the order they run in.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read};

use image::{DynamicImage, GrayImage, GrayAlphaImage, RgbImage, RgbaImage};
use png::{BitDepth, ColorType, Transformations};

use super::{ColorMode, ImageSource, PixelBuffer};

/// A decode step; failures come back as a message for the attempt chain.
pub(super) type Strategy = fn(&ImageSource<'_>, ColorMode) -> Result<PixelBuffer, String>;

/// Ordered `(strategy, description)` pairs for a source and mode.
///
/// `image` decodes PNG through the same `png` crate, so the last step only
/// rescues inputs the first two reject for reasons outside the codec, such
/// as `image`'s default allocation limits. For other bytes it repeats the
/// in-memory failure with a PNG-specific message.
pub(super) fn plan(source: &ImageSource<'_>, mode: ColorMode) -> Vec<(Strategy, &'static str)> {
    if mode == ColorMode::Palette {
        return vec![(decode_png_indexed as Strategy, "png indexed decode")];
    }
    match source {
        ImageSource::Path(_) => vec![
            (decode_native_path as Strategy, "native path decode"),
            (decode_from_memory as Strategy, "in-memory decode"),
            (decode_png_fallback as Strategy, "png fallback decode"),
        ],
        ImageSource::Bytes(_) => vec![
            (decode_from_memory as Strategy, "in-memory decode"),
            (decode_png_fallback as Strategy, "png fallback decode"),
        ],
    }
}

fn decode_native_path(source: &ImageSource<'_>, mode: ColorMode) -> Result<PixelBuffer, String> {
    let ImageSource::Path(path) = source else {
        return Err("source is not a path".to_string());
    };
    let img = image::open(path).map_err(|e| e.to_string())?;
    from_dynamic(img, mode)
}

fn decode_from_memory(source: &ImageSource<'_>, mode: ColorMode) -> Result<PixelBuffer, String> {
    let bytes = read_source(source)?;
    if bytes.is_empty() {
        return Err("file is empty".to_string());
    }
    let img = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    from_dynamic(img, mode)
}

fn decode_png_fallback(source: &ImageSource<'_>, mode: ColorMode) -> Result<PixelBuffer, String> {
    let frame = match source {
        ImageSource::Path(path) => {
            let file = File::open(path).map_err(|e| e.to_string())?;
            read_png(BufReader::new(file), Transformations::EXPAND | Transformations::STRIP_16)?
        }
        ImageSource::Bytes(bytes) => read_png(
            Cursor::new(*bytes),
            Transformations::EXPAND | Transformations::STRIP_16,
        )?,
    };

    let img = match frame.color_type {
        ColorType::Rgb => RgbImage::from_raw(frame.width, frame.height, frame.data)
            .map(DynamicImage::ImageRgb8),
        ColorType::Rgba => RgbaImage::from_raw(frame.width, frame.height, frame.data)
            .map(DynamicImage::ImageRgba8),
        ColorType::Grayscale => GrayImage::from_raw(frame.width, frame.height, frame.data)
            .map(DynamicImage::ImageLuma8),
        ColorType::GrayscaleAlpha => {
            GrayAlphaImage::from_raw(frame.width, frame.height, frame.data)
                .map(DynamicImage::ImageLumaA8)
        }
        ColorType::Indexed => None,
    }
    .ok_or_else(|| format!("unexpected {:?} output after expansion", frame.color_type))?;

    from_dynamic(img, mode)
}

fn decode_png_indexed(source: &ImageSource<'_>, _mode: ColorMode) -> Result<PixelBuffer, String> {
    let frame = match source {
        ImageSource::Path(path) => {
            let file = File::open(path).map_err(|e| e.to_string())?;
            read_png(BufReader::new(file), Transformations::IDENTITY)?
        }
        ImageSource::Bytes(bytes) => read_png(Cursor::new(*bytes), Transformations::IDENTITY)?,
    };

    if !matches!(frame.color_type, ColorType::Indexed | ColorType::Grayscale) {
        return Err(format!(
            "expected an indexed-color or greyscale image, found {:?}",
            frame.color_type
        ));
    }

    let bits = match frame.bit_depth {
        BitDepth::One => 1,
        BitDepth::Two => 2,
        BitDepth::Four => 4,
        BitDepth::Eight => 8,
        BitDepth::Sixteen => return Err("16-bit label maps are not supported".to_string()),
    };

    let data = unpack_samples(&frame.data, frame.line_size, frame.width, frame.height, bits);
    PixelBuffer::from_raw(frame.width, frame.height, ColorMode::Palette, data)
        .map_err(|e| e.to_string())
}

struct PngFrame {
    width: u32,
    height: u32,
    color_type: ColorType,
    bit_depth: BitDepth,
    line_size: usize,
    data: Vec<u8>,
}

fn read_png<R: Read>(reader: R, transformations: Transformations) -> Result<PngFrame, String> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(transformations);
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;
    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut data).map_err(|e| e.to_string())?;
    data.truncate(info.buffer_size());

    Ok(PngFrame {
        width: info.width,
        height: info.height,
        color_type: info.color_type,
        bit_depth: info.bit_depth,
        line_size: info.line_size,
        data,
    })
}

/// Expands packed rows of 1/2/4/8-bit samples into one byte per sample.
fn unpack_samples(rows: &[u8], line_size: usize, width: u32, height: u32, bits: u8) -> Vec<u8> {
    if bits == 8 {
        return rows
            .chunks(line_size)
            .take(height as usize)
            .flat_map(|row| &row[..width as usize])
            .copied()
            .collect();
    }

    let per_byte = (8 / bits) as usize;
    let mask = (1u16 << bits) as u8 - 1;
    let mut out = Vec::with_capacity(width as usize * height as usize);
    for row in rows.chunks(line_size).take(height as usize) {
        for x in 0..width as usize {
            let byte = row[x / per_byte];
            let shift = 8 - bits as usize * (x % per_byte + 1);
            out.push((byte >> shift) & mask);
        }
    }
    out
}

fn read_source<'a>(source: &ImageSource<'a>) -> Result<Cow<'a, [u8]>, String> {
    match source {
        ImageSource::Path(path) => fs::read(path).map(Cow::Owned).map_err(|e| e.to_string()),
        ImageSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
    }
}

fn from_dynamic(img: DynamicImage, mode: ColorMode) -> Result<PixelBuffer, String> {
    let (width, height) = (img.width(), img.height());
    let data = match mode {
        ColorMode::Rgb => img.into_rgb8().into_raw(),
        ColorMode::Bgr => {
            let mut data = img.into_rgb8().into_raw();
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            data
        }
        ColorMode::Grayscale => img.into_luma8().into_raw(),
        ColorMode::Palette => return Err("palette output needs the indexed decoder".to_string()),
    };
    PixelBuffer::from_raw(width, height, mode, data).map_err(|e| e.to_string())
}
