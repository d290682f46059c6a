use outline::{ComparisonOptions, EditCommand, EditSession, MaskSource, OutlineStyleConfig, RasterBuffer};

use image::DynamicImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;


#[derive(Error, Debug)]
pub enum OutlineCliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ImageError(#[from] image::ImageError),
    #[error(transparent)]
    OutlineError(#[from] outline::OutlineError),
    #[error("Invalid color '{0}', expected six hex digits like ff8800")]
    InvalidColor(String),
    #[error("Invalid {what} '{value}', expected {expected}")]
    InvalidArgument {
        what: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}


/// One image to outline, with its mask, style and edit history
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SideConfig {
    pub image: String,
    /// Mask file; when absent the image's own alpha channel is the mask
    pub mask: Option<String>,
    #[serde(default)]
    pub outline: OutlineStyleConfig,
    /// Edits replayed in order before rendering
    #[serde(default)]
    pub edits: Vec<EditCommand>,
}

/// A render job: one side, or two sides composed into a before/after image
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RenderJob {
    pub output: String,
    pub subject: SideConfig,
    /// Optional second side, placed after `subject`
    #[serde(default)]
    pub after: Option<SideConfig>,
    #[serde(default)]
    pub comparison: ComparisonOptions,
}

impl RenderJob {
    /// Load RenderJob configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, OutlineCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load RenderJob configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, OutlineCliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load RenderJob configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, OutlineCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load RenderJob configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, OutlineCliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OutlineCliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(OutlineCliError::UnsupportedFileFormat),
        }
    }

    /// Convert RenderJob to TOML string
    pub fn to_toml(&self) -> Result<String, OutlineCliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert RenderJob to JSON string
    pub fn to_json(&self) -> Result<String, OutlineCliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

/// Interpret a decoded mask file. Files with an alpha channel use it;
/// grayscale or opaque files use their luminance.
pub fn mask_source(mask: DynamicImage) -> MaskSource {
    if mask.color().has_alpha() {
        MaskSource::Rgba(mask.to_rgba8())
    } else {
        MaskSource::Alpha(mask.to_luma8())
    }
}

/// Load the image and mask of one side and replay its edits
pub fn open_session(side: &SideConfig) -> Result<EditSession, OutlineCliError> {
    let image = image::open(&side.image)?.to_rgba8();
    let mask = match &side.mask {
        Some(path) => mask_source(image::open(path)?),
        None => MaskSource::Rgba(image.clone()),
    };

    let mut session = EditSession::with_mask(image, mask)?;
    session.set_style(side.outline.clone());
    for command in &side.edits {
        debug!(%command, "replaying edit");
        session.apply(command.clone());
    }
    Ok(session)
}

/// Render one side with its configured style
pub fn render_side(side: &SideConfig) -> Result<RasterBuffer, OutlineCliError> {
    Ok(open_session(side)?.render_current())
}

/// Parse `rrggbb` or `#rrggbb`
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], OutlineCliError> {
    let digits = value.trim().trim_start_matches('#');
    let invalid = || OutlineCliError::InvalidColor(value.to_string());
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Parse a comma separated list of numbers, e.g. `12.5,40`
pub fn parse_numbers<const N: usize>(what: &'static str, value: &str) -> Result<[f32; N], OutlineCliError> {
    let expected = match N {
        2 => "x,y",
        3 => "x,y,radius",
        _ => "comma separated numbers",
    };
    let invalid = || OutlineCliError::InvalidArgument {
        what,
        value: value.to_string(),
        expected,
    };

    let parts: Vec<f32> = value
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    parts.try_into().map_err(|_| invalid())
}
