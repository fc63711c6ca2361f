#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

/// Writes an all-black 24-bit BMP screenshot.
pub fn write_bmp(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Writes a gradient RGB screenshot as PNG.
pub fn write_png_image(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("write png image");
}

/// Writes an 8-bit greyscale label map with `(class, x, y, w, h)` rectangles.
pub fn write_label(path: &Path, width: u32, height: u32, rects: &[(u8, u32, u32, u32, u32)]) {
    ensure_parent(path);
    let mut img = GrayImage::new(width, height);
    for &(class, x, y, w, h) in rects {
        for yy in y..(y + h).min(height) {
            for xx in x..(x + w).min(width) {
                img.put_pixel(xx, yy, Luma([class]));
            }
        }
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("write label png");
}

pub fn write_config(path: &Path, yaml: &str) {
    ensure_parent(path);
    fs::write(path, yaml).expect("write config");
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
}
