use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImagingError>;

/// Failures raised while reading, checking, or synthesizing images
#[derive(Debug, Error)]
pub enum ImagingError {
    /// Value is neither an existing file nor decodable inline data
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Bytes are not a raster image we can decode
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    /// Image is below a per-side or pixel-count floor
    #[error("{0}")]
    DimensionTooSmall(String),

    /// Image is above a pixel-count ceiling
    #[error("{0}")]
    DimensionTooLarge(String),

    /// Mask and target image differ in size
    #[error("{0}")]
    MaskMismatch(String),

    /// Mask pixel layout cannot be interpreted as intensity
    #[error("Unsupported mask format: {0}")]
    UnsupportedMaskFormat(String),

    /// Mask geometry is out of bounds or non-positive
    #[error("Invalid mask geometry: {0}")]
    InvalidGeometry(String),

    /// Encoding a synthesized image failed
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl ImagingError {
    /// Stable tag for this failure
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidImageData(_) => "invalid_image_data",
            Self::UnreadableImage(_) => "unreadable_image",
            Self::DimensionTooSmall(_) => "dimension_too_small",
            Self::DimensionTooLarge(_) => "dimension_too_large",
            Self::MaskMismatch(_) => "mask_mismatch",
            Self::UnsupportedMaskFormat(_) => "unsupported_mask_format",
            Self::InvalidGeometry(_) => "invalid_geometry",
            Self::Encode(_) => "encode_error",
        }
    }
}
