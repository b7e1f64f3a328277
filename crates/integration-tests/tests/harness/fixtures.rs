//! Small generated images used as tool inputs and canned model output

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

/// Encoded RGB PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 90, 160]));
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

/// Base64 of [`png`]
pub fn png_b64(width: u32, height: u32) -> String {
    STANDARD.encode(png(width, height))
}

/// Base64 single-channel mask, fully white
pub fn mask_b64(width: u32, height: u32) -> String {
    let mask = GrayImage::from_pixel(width, height, Luma([255]));
    STANDARD.encode(encode(&DynamicImage::ImageLuma8(mask), ImageFormat::Png))
}

/// Write a PNG into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png(width, height)).expect("write fixture");
    path
}

/// Files currently saved in `dir`, empty when the directory does not exist
pub fn saved_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).expect("encode fixture");
    out.into_inner()
}
