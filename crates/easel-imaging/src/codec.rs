//! Image references, base64 transport encoding, and dimension probing

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ColorType, ImageDecoder, ImageReader};

use crate::error::{ImagingError, Result};

/// Pixel size of a raster image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count
    pub const fn pixels(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Header information read from an encoded image
#[derive(Debug, Clone, Copy)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub color: ColorType,
}

/// A caller-supplied image: a file on disk or inline base64 data
///
/// Classification checks the filesystem first. A string naming an existing
/// file is always a path, even when it would also decode as base64.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageRef {
    Path(PathBuf),
    Inline(Vec<u8>),
}

impl ImageRef {
    /// Classify a caller string
    pub fn parse(value: &str) -> Result<Self> {
        let path = Path::new(value);
        if !value.is_empty() && path.is_file() {
            return Ok(Self::Path(path.to_path_buf()));
        }

        decode(value).map(Self::Inline)
    }

    /// Raw image bytes
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => std::fs::read(path)
                .map_err(|e| ImagingError::InvalidImageData(format!("failed to read {}: {e}", path.display()))),
            Self::Inline(bytes) => Ok(bytes.clone()),
        }
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Inline(bytes) => write!(f, "Inline({} bytes)", bytes.len()),
        }
    }
}

/// Resolve a path-or-inline string to raw bytes
pub fn resolve(value: &str) -> Result<Vec<u8>> {
    ImageRef::parse(value)?.read()
}

/// Encode bytes for a JSON request body
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode inline base64, tolerating a `data:` URL prefix and line breaks
pub fn decode(value: &str) -> Result<Vec<u8>> {
    let payload = value
        .split_once(";base64,")
        .filter(|(scheme, _)| scheme.starts_with("data:"))
        .map_or(value, |(_, data)| data);

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ImagingError::InvalidImageData(
            "value is neither an existing file nor base64 data".to_string(),
        ));
    }

    BASE64.decode(compact.as_bytes()).map_err(|e| {
        ImagingError::InvalidImageData(format!("value is neither an existing file nor valid base64: {e}"))
    })
}

/// Read the header of an encoded image
pub fn probe(bytes: &[u8]) -> Result<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImagingError::UnreadableImage(e.to_string()))?;

    let Some(format) = reader.format() else {
        return Err(ImagingError::UnreadableImage("unrecognized image format".to_string()));
    };

    let decoder = reader
        .into_decoder()
        .map_err(|e| ImagingError::UnreadableImage(e.to_string()))?;
    let (width, height) = decoder.dimensions();
    tracing::debug!(?format, width, height, bytes = bytes.len(), "read image header");

    Ok(ImageInfo {
        dimensions: Dimensions::new(width, height),
        color: decoder.color_type(),
    })
}

/// Pixel dimensions of an encoded image
pub fn probe_dimensions(bytes: &[u8]) -> Result<Dimensions> {
    probe(bytes).map(|info| info.dimensions)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use image::{GrayImage, ImageFormat, RgbImage};

    use super::*;

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbImage::new(width, height).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    pub(crate) fn gray_png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        GrayImage::new(width, height).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn inline_round_trip() {
        let bytes = png(17, 9);
        assert_eq!(resolve(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn data_url_prefix_is_accepted() {
        let bytes = png(4, 4);
        let url = format!("data:image/png;base64,{}", encode(&bytes));
        assert_eq!(resolve(&url).unwrap(), bytes);
    }

    #[test]
    fn existing_path_is_read_from_disk() {
        let bytes = png(8, 8);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let reference = ImageRef::parse(file.path().to_str().unwrap()).unwrap();
        assert!(matches!(reference, ImageRef::Path(_)));
        assert_eq!(reference.read().unwrap(), bytes);
    }

    #[test]
    fn existing_path_wins_over_base64_interpretation() {
        // "abcd" decodes as base64 too
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abcd");
        std::fs::write(&path, png(2, 2)).unwrap();

        let reference = ImageRef::parse(path.to_str().unwrap()).unwrap();
        assert_eq!(reference, ImageRef::Path(path));
    }

    #[test]
    fn resolution_is_idempotent() {
        let encoded = encode(&png(3, 5));
        assert_eq!(resolve(&encoded).unwrap(), resolve(&encoded).unwrap());
    }

    #[test]
    fn garbage_is_invalid_image_data() {
        let err = resolve("/no/such/file.png").unwrap_err();
        assert_eq!(err.kind(), "invalid_image_data");
        assert_eq!(resolve("").unwrap_err().kind(), "invalid_image_data");
    }

    #[test]
    fn probes_dimensions_and_color() {
        let info = probe(&gray_png(31, 7)).unwrap();
        assert_eq!(info.dimensions, Dimensions::new(31, 7));
        assert_eq!(info.color, ColorType::L8);
    }

    #[test]
    fn non_image_bytes_are_unreadable() {
        let err = probe_dimensions(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), "unreadable_image");
    }

    #[test]
    fn dimensions_display_and_pixels() {
        let dims = Dimensions::new(1024, 768);
        assert_eq!(dims.to_string(), "1024x768");
        assert_eq!(dims.pixels(), 786_432);
    }
}
