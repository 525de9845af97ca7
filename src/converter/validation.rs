use crate::error::ValidationError;
use crate::models::{CompressionType, ConversionRequest, Preset, WebpConfig};
use crate::utils::strip_file_scheme;
use serde_json::Value;

/// Validate caller input and build the normalized request.
///
/// Checks run in a fixed order so the first reported field is stable:
/// input path, output path, config, type, quality, preset. An absent preset
/// becomes [`Preset::Default`] and a leading `file://` is stripped from both
/// paths. The caller's config is never modified.
pub fn validate_args(
    input_path: &str,
    output_path: &str,
    config: Option<&WebpConfig>,
) -> Result<ConversionRequest, ValidationError> {
    validate_paths(input_path, output_path)?;

    let config = config.ok_or_else(|| ValidationError::Config("None".to_string()))?;

    let compression = CompressionType::try_from(config.compression)
        .map_err(|value| ValidationError::Type(value.to_string()))?;

    if !config.quality.is_finite() || !(0.0..=100.0).contains(&config.quality) {
        return Err(ValidationError::Quality(config.quality.to_string()));
    }

    let preset = match config.preset {
        Some(code) => {
            Preset::try_from(code).map_err(|value| ValidationError::Preset(value.to_string()))?
        }
        None => Preset::Default,
    };

    Ok(ConversionRequest {
        input_path: strip_file_scheme(input_path).to_string(),
        output_path: strip_file_scheme(output_path).to_string(),
        quality: config.quality,
        compression,
        preset,
    })
}

/// The path half of [`validate_args`].
pub fn validate_paths(input_path: &str, output_path: &str) -> Result<(), ValidationError> {
    if input_path.is_empty() {
        return Err(ValidationError::InputPath(format!("{:?}", input_path)));
    }

    if output_path.is_empty() {
        return Err(ValidationError::OutputPath(format!("{:?}", output_path)));
    }

    Ok(())
}

/// Read a config from untyped JSON, reporting malformed fields as validation errors.
///
/// `null` or a missing `preset` means absent. Integral floats such as `1.0`
/// are accepted for `type`. A fractional `preset` inside `[0, 5]` is
/// truncated toward zero; outside that range it is rejected as given.
pub fn config_from_value(value: &Value) -> Result<WebpConfig, ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Config(value.to_string()))?;

    let field = |name: &str| object.get(name).unwrap_or(&Value::Null);

    let compression = field("type");
    let compression = as_integer(compression)
        .ok_or_else(|| ValidationError::Type(compression.to_string()))?;

    let quality = field("quality");
    let quality = quality
        .as_f64()
        .ok_or_else(|| ValidationError::Quality(quality.to_string()))?;

    let preset = match field("preset") {
        Value::Null => None,
        other => Some(as_preset_code(other).ok_or_else(|| ValidationError::Preset(other.to_string()))?),
    };

    Ok(WebpConfig {
        quality,
        compression,
        preset,
    })
}

fn as_preset_code(value: &Value) -> Option<i64> {
    if let Some(code) = value.as_i64() {
        return Some(code);
    }
    value
        .as_f64()
        .filter(|f| (0.0..=5.0).contains(f))
        .map(|f| f.trunc() as i64)
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}
