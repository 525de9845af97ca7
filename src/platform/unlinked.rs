use super::ConversionService;
use crate::models::ConversionRequest;
use crate::{Error, Result};
use async_trait::async_trait;

pub const LINKING_ERROR: &str = "The package 'webp-converter' doesn't seem to be linked. Make sure: \n\n\
- A native conversion service is registered under the 'WebpConverter' module name\n\
- WEBP_CONVERTER_LINKED is not set to false\n\
- The selected architecture matches the way the service was bound\n";

/// Stand-in used when no conversion service could be resolved.
///
/// Every call fails with the same [`Error::Linking`] until the process is
/// restarted with a working binding.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlinkedConverter;

impl UnlinkedConverter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConversionService for UnlinkedConverter {
    async fn convert_image_to_webp(&self, _request: &ConversionRequest) -> Result<String> {
        Err(Error::Linking(LINKING_ERROR.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompressionType, Preset};

    fn request() -> ConversionRequest {
        ConversionRequest {
            input_path: "/tmp/in.png".to_string(),
            output_path: "/tmp/out.webp".to_string(),
            quality: 80.0,
            compression: CompressionType::Lossy,
            preset: Preset::Default,
        }
    }

    #[tokio::test]
    async fn test_unlinked_always_fails_identically() {
        let converter = UnlinkedConverter::new();

        let first = converter.convert_image_to_webp(&request()).await.unwrap_err();
        let second = converter.convert_image_to_webp(&request()).await.unwrap_err();

        assert!(matches!(first, Error::Linking(_)));
        assert_eq!(first.to_string(), second.to_string());
        assert!(first.to_string().contains("doesn't seem to be linked"));
    }
}
