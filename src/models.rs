//! Data models and structures
//!
//! Defines the raw conversion options a caller hands in, the validated
//! request the platform service consumes, and environment configuration.

use crate::binding::Architecture;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WebP compression type. The numeric values are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
    Lossy = 1,
    Lossless = 2,
}

impl CompressionType {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for CompressionType {
    type Error = i64;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(CompressionType::Lossy),
            2 => Ok(CompressionType::Lossless),
            other => Err(other),
        }
    }
}

impl FromStr for CompressionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lossy" | "1" => Ok(CompressionType::Lossy),
            "lossless" | "2" => Ok(CompressionType::Lossless),
            _ => Err(format!(
                "Invalid compression type '{}'. Expected lossy or lossless",
                s
            )),
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::Lossy => write!(f, "lossy"),
            CompressionType::Lossless => write!(f, "lossless"),
        }
    }
}

/// Encoder hint for a category of source imagery.
///
/// Only honored by encoders with preset support; others accept and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Default = 0,
    /// Digital picture, like a portrait or inner shot.
    Picture = 1,
    /// Outdoor photograph with natural lighting.
    Photo = 2,
    /// Hand or line drawing with high-contrast details.
    Drawing = 3,
    /// Small-sized colorful images.
    Icon = 4,
    /// Text-like images.
    Text = 5,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Default,
        Preset::Picture,
        Preset::Photo,
        Preset::Drawing,
        Preset::Icon,
        Preset::Text,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "DEFAULT",
            Preset::Picture => "PICTURE",
            Preset::Photo => "PHOTO",
            Preset::Drawing => "DRAWING",
            Preset::Icon => "ICON",
            Preset::Text => "TEXT",
        }
    }
}

impl TryFrom<i64> for Preset {
    type Error = i64;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Preset::ALL
            .into_iter()
            .find(|p| p.code() == value)
            .ok_or(value)
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i64>() {
            return Preset::try_from(code).map_err(|c| format!("Invalid preset '{}'", c));
        }
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid preset '{}'. Expected one of default, picture, photo, drawing, icon, text",
                    s
                )
            })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied conversion options, unvalidated.
///
/// Field values are kept raw so out-of-range input can be represented and
/// rejected by the validator instead of by the type system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebpConfig {
    /// Visual quality for lossy, compression effort for lossless. `[0, 100]`.
    pub quality: f64,
    #[serde(rename = "type")]
    pub compression: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<i64>,
}

impl WebpConfig {
    pub fn new(quality: f64, compression: CompressionType) -> Self {
        Self {
            quality,
            compression: compression.code(),
            preset: None,
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset.code());
        self
    }
}

impl Default for WebpConfig {
    fn default() -> Self {
        Self::new(80.0, CompressionType::Lossy).with_preset(Preset::Default)
    }
}

/// A validated, normalized conversion request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input_path: String,
    pub output_path: String,
    pub quality: f64,
    pub compression: CompressionType,
    pub preset: Preset,
}

impl ConversionRequest {
    /// Projects the request back onto the raw config shape, preset included.
    pub fn config(&self) -> WebpConfig {
        WebpConfig {
            quality: self.quality,
            compression: self.compression.code(),
            preset: Some(self.preset.code()),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub architecture: Architecture,
    pub linked: bool,
    pub default_quality: f64,
    pub default_type: CompressionType,
    pub default_preset: Preset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            architecture: Architecture::Direct,
            linked: true,
            default_quality: 80.0,
            default_type: CompressionType::Lossy,
            default_preset: Preset::Default,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let architecture = match lookup("WEBP_CONVERTER_ARCHITECTURE") {
            Some(value) => value.parse::<Architecture>().map_err(Error::Config)?,
            None => defaults.architecture,
        };

        let linked = match lookup("WEBP_CONVERTER_LINKED") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                Error::Config(format!("WEBP_CONVERTER_LINKED must be true or false, got '{}'", value))
            })?,
            None => defaults.linked,
        };

        let default_quality = match lookup("WEBP_DEFAULT_QUALITY") {
            Some(value) => value.parse::<f64>().map_err(|_| {
                Error::Config(format!("WEBP_DEFAULT_QUALITY must be a number, got '{}'", value))
            })?,
            None => defaults.default_quality,
        };

        let default_type = match lookup("WEBP_DEFAULT_TYPE") {
            Some(value) => value.parse::<CompressionType>().map_err(Error::Config)?,
            None => defaults.default_type,
        };

        let default_preset = match lookup("WEBP_DEFAULT_PRESET") {
            Some(value) => value.parse::<Preset>().map_err(Error::Config)?,
            None => defaults.default_preset,
        };

        Ok(Self {
            architecture,
            linked,
            default_quality,
            default_type,
            default_preset,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_serialization_uses_type_key() {
        let config = WebpConfig::new(75.0, CompressionType::Lossless);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"type\":2"));
        assert!(!json.contains("preset"));

        let deserialized: WebpConfig =
            serde_json::from_str(r#"{"quality": 50, "type": 1, "preset": 4}"#).unwrap();
        assert_eq!(deserialized.compression, 1);
        assert_eq!(deserialized.preset, Some(4));
    }

    #[test]
    fn test_enum_codes() {
        assert_eq!(CompressionType::try_from(1), Ok(CompressionType::Lossy));
        assert_eq!(CompressionType::try_from(2), Ok(CompressionType::Lossless));
        assert_eq!(CompressionType::try_from(0), Err(0));
        assert_eq!(CompressionType::try_from(3), Err(3));

        assert_eq!(Preset::try_from(0), Ok(Preset::Default));
        assert_eq!(Preset::try_from(5), Ok(Preset::Text));
        assert_eq!(Preset::try_from(6), Err(6));
        assert_eq!(Preset::try_from(-1), Err(-1));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Lossless".parse::<CompressionType>(), Ok(CompressionType::Lossless));
        assert_eq!("icon".parse::<Preset>(), Ok(Preset::Icon));
        assert_eq!("3".parse::<Preset>(), Ok(Preset::Drawing));
        assert!("sketch".parse::<Preset>().is_err());
        assert!("lossier".parse::<CompressionType>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.architecture, Architecture::Direct);
        assert!(config.linked);
        assert_eq!(config.default_quality, 80.0);
        assert_eq!(config.default_type, CompressionType::Lossy);
        assert_eq!(config.default_preset, Preset::Default);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("WEBP_CONVERTER_ARCHITECTURE", "bridge"),
            ("WEBP_CONVERTER_LINKED", "false"),
            ("WEBP_DEFAULT_QUALITY", "65"),
            ("WEBP_DEFAULT_TYPE", "lossless"),
            ("WEBP_DEFAULT_PRESET", "photo"),
        ]))
        .unwrap();

        assert_eq!(config.architecture, Architecture::Bridge);
        assert!(!config.linked);
        assert_eq!(config.default_quality, 65.0);
        assert_eq!(config.default_type, CompressionType::Lossless);
        assert_eq!(config.default_preset, Preset::Photo);
    }

    #[test]
    fn test_config_rejects_unknown_architecture() {
        let err = Config::from_lookup(lookup_from(&[("WEBP_CONVERTER_ARCHITECTURE", "paper")]))
            .unwrap_err();
        assert!(err.to_string().contains("paper"));
    }
}
