//! Application wiring for the command-line host.

use crate::binding::{Binding, ModuleRegistry, MODULE_NAME};
use crate::converter::WebpConverter;
use crate::models::{CompressionType, Config, Preset, WebpConfig};
use crate::platform::{ConversionService, NativeConverter};
use crate::utils::{strip_file_scheme, webp_output_path};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Qualities swept by [`App::samples`], best first.
pub fn sample_qualities() -> impl Iterator<Item = u8> {
    (1..=20).rev().map(|step| step * 5)
}

/// Outcome of one conversion, with file sizes for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input_path: String,
    pub output_path: String,
    pub quality: f64,
    #[serde(rename = "type")]
    pub compression: String,
    pub preset: String,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl ConversionReport {
    /// Output size relative to input size, as a percentage.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64 * 100.0
    }
}

pub struct App {
    converter: WebpConverter,
    config: Config,
}

impl App {
    /// Build an app around an already-resolved converter.
    ///
    /// Integration tests use this to inject mocks.
    pub fn with_converter(converter: WebpConverter, config: Config) -> Self {
        Self { converter, config }
    }

    /// Resolve the binding described by `config` and build the app.
    ///
    /// With `linked = false` nothing is offered to either mechanism, so the
    /// binding resolves to the unlinked stub.
    pub fn from_config(config: Config) -> Self {
        let native: Option<Arc<dyn ConversionService>> = if config.linked {
            Some(Arc::new(NativeConverter::new()))
        } else {
            None
        };

        let mut registry = ModuleRegistry::new();
        if let Some(service) = &native {
            registry.register(MODULE_NAME, Arc::clone(service));
        }

        let binding = Binding::resolve(config.architecture, native, &registry);
        Self::with_converter(WebpConverter::new(binding), config)
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        Ok(Self::from_config(Config::from_env()?))
    }

    pub fn converter(&self) -> &WebpConverter {
        &self.converter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Conversion options from configured defaults, overridden where given.
    pub fn webp_config(
        &self,
        quality: Option<f64>,
        compression: Option<CompressionType>,
        preset: Option<Preset>,
    ) -> WebpConfig {
        WebpConfig::new(
            quality.unwrap_or(self.config.default_quality),
            compression.unwrap_or(self.config.default_type),
        )
        .with_preset(preset.unwrap_or(self.config.default_preset))
    }

    /// Convert one file. `output_path` defaults to the input with a `.webp` extension.
    pub async fn convert(
        &self,
        input_path: &str,
        output_path: Option<&str>,
        config: &WebpConfig,
    ) -> Result<ConversionReport> {
        let output_path = output_path
            .map(str::to_string)
            .unwrap_or_else(|| webp_output_path(input_path));

        let written = self
            .converter
            .convert_image(input_path, &output_path, Some(config))
            .await?;

        self.report(input_path, written, config).await
    }

    /// Convert `input_path` once per quality in [`sample_qualities`].
    ///
    /// Outputs are named `<stem>-q<NN>.webp` and land in `out_dir`, or next
    /// to the input when no directory is given.
    pub async fn samples(
        &self,
        input_path: &str,
        out_dir: Option<&Path>,
        compression: CompressionType,
        preset: Preset,
    ) -> Result<Vec<ConversionReport>> {
        let source = Path::new(strip_file_scheme(input_path));
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config(format!("Cannot derive a file name from '{}'", input_path)))?;

        let out_dir: PathBuf = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        if !out_dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&out_dir).await?;
        }

        let mut reports = Vec::new();
        for quality in sample_qualities() {
            let config = WebpConfig::new(f64::from(quality), compression).with_preset(preset);
            let output = out_dir
                .join(format!("{}-q{:02}.webp", stem, quality))
                .to_string_lossy()
                .into_owned();
            let report = self
                .convert(input_path, Some(output.as_str()), &config)
                .await?;
            reports.push(report);
        }

        info!(
            "Generated {} samples of {} in {}",
            reports.len(),
            input_path,
            out_dir.display()
        );
        Ok(reports)
    }

    async fn report(
        &self,
        input_path: &str,
        output_path: String,
        config: &WebpConfig,
    ) -> Result<ConversionReport> {
        let input_bytes = tokio::fs::metadata(strip_file_scheme(input_path)).await?.len();
        let output_bytes = tokio::fs::metadata(&output_path).await?.len();

        let compression = CompressionType::try_from(config.compression)
            .map(|c| c.to_string())
            .unwrap_or_else(|code| code.to_string());
        let preset = config
            .preset
            .and_then(|code| Preset::try_from(code).ok())
            .unwrap_or_default();

        Ok(ConversionReport {
            input_path: strip_file_scheme(input_path).to_string(),
            output_path,
            quality: config.quality,
            compression,
            preset: preset.to_string(),
            input_bytes,
            output_bytes,
        })
    }
}
