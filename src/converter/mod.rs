//! Validated conversion boundary
//!
//! [`WebpConverter`] rejects malformed requests before any I/O happens,
//! normalizes what it accepts and hands it to the bound platform service.

pub mod validation;

pub use validation::{config_from_value, validate_args, validate_paths};

use crate::binding::Binding;
use crate::models::WebpConfig;
use crate::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct WebpConverter {
    binding: Binding,
}

impl WebpConverter {
    pub fn new(binding: Binding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Convert `input_path` to WebP at `output_path`.
    ///
    /// Resolves with the path the platform service reports having written.
    /// Validation errors are returned before the service is called; service
    /// errors are returned as-is.
    pub async fn convert_image(
        &self,
        input_path: &str,
        output_path: &str,
        config: Option<&WebpConfig>,
    ) -> Result<String> {
        let request = validate_args(input_path, output_path, config).inspect_err(|e| {
            warn!("Rejected conversion request: {}", e);
        })?;
        debug!("Dispatching conversion request: {:?}", request);

        let path = self
            .binding
            .service()
            .convert_image_to_webp(&request)
            .await?;

        info!(
            "Converted {} to {} ({}, quality {}, preset {})",
            request.input_path, path, request.compression, request.quality, request.preset
        );
        Ok(path)
    }

    /// Same as [`convert_image`](Self::convert_image), with the config given as untyped JSON.
    pub async fn convert_image_json(
        &self,
        input_path: &str,
        output_path: &str,
        config: Option<&Value>,
    ) -> Result<String> {
        validate_paths(input_path, output_path)?;
        let config = match config {
            Some(value) => Some(config_from_value(value)?),
            None => None,
        };
        self.convert_image(input_path, output_path, config.as_ref())
            .await
    }
}
