use super::ConversionService;
use crate::models::{CompressionType, ConversionRequest, Preset};
use crate::utils::strip_file_scheme;
use crate::{Error, Result};
use async_trait::async_trait;
use libwebp_sys::{WebPConfig, WebPPreset};
use tracing::debug;

/// In-process WebP encoder: decodes with `image`, encodes with libwebp.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeConverter;

impl NativeConverter {
    pub fn new() -> Self {
        Self
    }

    fn encoder_preset(preset: Preset) -> WebPPreset {
        match preset {
            Preset::Default => WebPPreset::WEBP_PRESET_DEFAULT,
            Preset::Picture => WebPPreset::WEBP_PRESET_PICTURE,
            Preset::Photo => WebPPreset::WEBP_PRESET_PHOTO,
            Preset::Drawing => WebPPreset::WEBP_PRESET_DRAWING,
            Preset::Icon => WebPPreset::WEBP_PRESET_ICON,
            Preset::Text => WebPPreset::WEBP_PRESET_TEXT,
        }
    }

    /// Scale lossless effort in `[0, 100]` onto libwebp's method range `0..=6`.
    fn lossless_method(quality: f64) -> i32 {
        ((quality / 100.0) * 6.0).round().clamp(0.0, 6.0) as i32
    }

    fn encoder_config(request: &ConversionRequest) -> Result<WebPConfig> {
        let quality = request.quality as f32;
        let mut config = WebPConfig::new_with_preset(Self::encoder_preset(request.preset), quality)
            .map_err(|_| Error::Conversion("Could not initialize WebP encoder".to_string()))?;

        match request.compression {
            CompressionType::Lossy => {
                config.lossless = 0;
                config.quality = quality;
            }
            CompressionType::Lossless => {
                config.lossless = 1;
                config.quality = quality;
                config.method = Self::lossless_method(request.quality);
            }
        }

        Ok(config)
    }

    fn convert_sync(request: ConversionRequest) -> Result<String> {
        let input_path = strip_file_scheme(&request.input_path);
        let output_path = strip_file_scheme(&request.output_path);

        let load_error = || Error::Conversion(format!("Could not load from {}", input_path));
        let image = image::ImageReader::open(input_path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|_| load_error())?
            .decode()
            .map_err(|_| load_error())?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let config = Self::encoder_config(&request)?;
        let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_advanced(&config)
            .map_err(|e| Error::Conversion(format!("WebP encoding failed: {:?}", e)))?;

        std::fs::write(output_path, &*encoded).map_err(|e| Error::Conversion(e.to_string()))?;
        debug!(
            "Encoded {}x{} image to {} ({} bytes)",
            width,
            height,
            output_path,
            encoded.len()
        );

        Ok(output_path.to_string())
    }
}

#[async_trait]
impl ConversionService for NativeConverter {
    async fn convert_image_to_webp(&self, request: &ConversionRequest) -> Result<String> {
        tokio::task::spawn_blocking({
            let request = request.clone();
            move || Self::convert_sync(request)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Conversion task join error: {}", e)))?
    }
}
