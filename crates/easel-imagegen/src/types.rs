use serde::Serialize;
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString, VariantNames};

/// Encoding of saved artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    #[default]
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension written to disk
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Nova Canvas rendering quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    Premium,
}

/// Output framing for SD3.5 text-to-image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
pub enum AspectRatio {
    #[strum(serialize = "16:9")]
    Wide16x9,
    #[default]
    #[strum(serialize = "1:1")]
    Square,
    #[strum(serialize = "21:9")]
    Ultrawide21x9,
    #[strum(serialize = "2:3")]
    Portrait2x3,
    #[strum(serialize = "3:2")]
    Landscape3x2,
    #[strum(serialize = "4:5")]
    Portrait4x5,
    #[strum(serialize = "5:4")]
    Landscape5x4,
    #[strum(serialize = "9:16")]
    Tall9x16,
    #[strum(serialize = "9:21")]
    Tall9x21,
}

/// Named aesthetic presets understood by the Stability models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum StylePreset {
    #[strum(serialize = "3d-model")]
    ThreeDModel,
    AnalogFilm,
    Anime,
    Cinematic,
    ComicBook,
    DigitalArt,
    Enhance,
    FantasyArt,
    Isometric,
    LineArt,
    LowPoly,
    ModelingCompound,
    NeonPunk,
    Origami,
    Photographic,
    PixelArt,
    TileTexture,
}

/// Outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Uniform response returned for every operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResponse {
    pub status: Status,
    pub message: String,
    /// Absolute paths of saved artifacts, empty on error
    pub paths: Vec<String>,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub metadata: Map<String, Value>,
}

impl OperationResponse {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Whether a failed call may succeed if repeated
    pub fn is_retryable(&self) -> bool {
        self.metadata.get("retryable").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Stable failure tag, if any
    pub fn error_kind(&self) -> Option<&str> {
        self.metadata.get("error_kind").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn output_format_parses_and_maps_extension() {
        assert_eq!(OutputFormat::from_str("jpeg").unwrap().extension(), "jpg");
        assert_eq!(OutputFormat::default().as_ref(), "png");
        assert!(OutputFormat::from_str("gif").is_err());
    }

    #[test]
    fn style_presets_use_wire_names() {
        assert_eq!(StylePreset::VARIANTS.len(), 17);
        assert_eq!(StylePreset::ThreeDModel.as_ref(), "3d-model");
        assert_eq!(StylePreset::from_str("modeling-compound").unwrap(), StylePreset::ModelingCompound);
    }

    #[test]
    fn aspect_ratios_round_trip_names() {
        assert_eq!(AspectRatio::VARIANTS.len(), 9);
        assert_eq!(AspectRatio::from_str("9:21").unwrap(), AspectRatio::Tall9x21);
        assert_eq!(AspectRatio::default().as_ref(), "1:1");
    }
}
