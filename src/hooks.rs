//! Stateful convenience wrapper around [`WebpConverter`]
//!
//! Holds an input path and a config, converts on demand and publishes
//! `{ uri, error, is_loading }` through a `watch` channel so a UI layer can
//! observe it. Overlapping `convert` calls are not serialized; whichever
//! finishes last wins.

use crate::converter::WebpConverter;
use crate::models::WebpConfig;
use crate::utils::webp_output_path;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterState {
    pub uri: Option<String>,
    pub error: Option<String>,
    pub is_loading: bool,
}

/// What the next conversion runs on.
#[derive(Debug, Clone)]
struct Inputs {
    input_path: Option<String>,
    config: WebpConfig,
}

pub struct ConverterHandle {
    converter: WebpConverter,
    inputs: Mutex<Inputs>,
    state: watch::Sender<ConverterState>,
}

impl ConverterHandle {
    pub fn new(converter: WebpConverter, input_path: Option<String>, config: WebpConfig) -> Self {
        let (state, _) = watch::channel(ConverterState::default());
        Self {
            converter,
            inputs: Mutex::new(Inputs { input_path, config }),
            state,
        }
    }

    /// Build a handle and run the first conversion right away.
    pub async fn mount(
        converter: WebpConverter,
        input_path: Option<String>,
        config: WebpConfig,
    ) -> Self {
        let handle = Self::new(converter, input_path, config);
        handle.convert().await;
        handle
    }

    pub fn state(&self) -> ConverterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConverterState> {
        self.state.subscribe()
    }

    pub fn config(&self) -> WebpConfig {
        self.lock_inputs().config
    }

    pub fn input_path(&self) -> Option<String> {
        self.lock_inputs().input_path.clone()
    }

    /// Replace the input path. A changed path clears any previous error.
    pub fn set_input_path(&self, input_path: Option<String>) {
        let changed = {
            let mut inputs = self.lock_inputs();
            let changed = inputs.input_path != input_path;
            inputs.input_path = input_path;
            changed
        };

        if changed {
            self.state.send_modify(|state| state.error = None);
        }
    }

    /// Replace the input path and convert it.
    pub async fn change_input_path(&self, input_path: Option<String>) {
        self.set_input_path(input_path);
        self.convert().await;
    }

    /// Replace the options used by later conversions.
    pub fn set_config(&self, config: WebpConfig) {
        self.lock_inputs().config = config;
    }

    /// Replace the options and convert again with them.
    pub async fn change_config(&self, config: WebpConfig) {
        self.set_config(config);
        self.convert().await;
    }

    /// Point the handle at `input_path` with `config`, then convert.
    pub async fn convert_with(&self, input_path: impl Into<String>, config: WebpConfig) {
        self.set_input_path(Some(input_path.into()));
        self.change_config(config).await;
    }

    /// Convert the current input to a sibling `.webp` file.
    ///
    /// Does nothing when there is no input path.
    pub async fn convert(&self) {
        let Inputs { input_path, config } = self.lock_inputs().clone();
        let Some(input_path) = input_path.filter(|p| !p.is_empty()) else {
            return;
        };

        self.state.send_modify(|state| state.is_loading = true);

        let output_path = webp_output_path(&input_path);
        let result = self
            .converter
            .convert_image(&input_path, &output_path, Some(&config))
            .await;

        self.state.send_modify(|state| {
            match result {
                Ok(uri) => state.uri = Some(uri),
                Err(e) => {
                    error!("Conversion of {} failed: {}", input_path, e);
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    fn lock_inputs(&self) -> std::sync::MutexGuard<'_, Inputs> {
        self.inputs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::models::{CompressionType, Preset};
    use crate::platform::MockConverter;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn handle_with(mock: &MockConverter, input: Option<&str>) -> ConverterHandle {
        ConverterHandle::new(
            WebpConverter::new(Binding::direct(Arc::new(mock.clone()))),
            input.map(str::to_string),
            WebpConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_convert_publishes_uri() {
        let mock = MockConverter::new();
        let handle = handle_with(&mock, Some("/tmp/photo.png"));

        handle.convert().await;

        assert_eq!(
            handle.state(),
            ConverterState {
                uri: Some("/tmp/photo.webp".to_string()),
                error: None,
                is_loading: false,
            }
        );
        let request = mock.last_request().unwrap();
        assert_eq!(request.output_path, "/tmp/photo.webp");
        assert_eq!(request.quality, 80.0);
    }

    #[tokio::test]
    async fn test_convert_without_input_does_nothing() {
        let mock = MockConverter::new();
        let handle = handle_with(&mock, None);

        handle.convert().await;

        assert_eq!(handle.state(), ConverterState::default());
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_publishes_error() {
        let mock = MockConverter::new().with_failure("decode failed");
        let handle = handle_with(&mock, Some("/tmp/broken.png"));

        handle.convert().await;

        let state = handle.state();
        assert_eq!(state.error.as_deref(), Some("decode failed"));
        assert_eq!(state.uri, None);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_changing_input_clears_error() {
        let mock = MockConverter::new().with_failure("decode failed");
        let handle = handle_with(&mock, Some("/tmp/broken.png"));
        handle.convert().await;
        assert!(handle.state().error.is_some());

        handle.set_input_path(Some("/tmp/broken.png".to_string()));
        assert!(handle.state().error.is_some());

        handle.set_input_path(Some("/tmp/other.png".to_string()));
        assert_eq!(handle.state().error, None);
    }

    #[tokio::test]
    async fn test_subscriber_sees_loading_then_result() {
        let release = Arc::new(Notify::new());
        let mock = MockConverter::new().with_hold(release.clone());
        let handle = Arc::new(handle_with(&mock, Some("/tmp/photo.jpg")));
        let mut rx = handle.subscribe();

        let task = tokio::spawn({
            let handle = handle.clone();
            async move { handle.convert().await }
        });

        rx.wait_for(|state| state.is_loading).await.unwrap();
        let during = handle.state();
        assert!(during.is_loading);
        assert_eq!(during.uri, None);

        release.notify_one();
        task.await.unwrap();

        let after = rx.borrow_and_update().clone();
        assert_eq!(after.uri.as_deref(), Some("/tmp/photo.webp"));
        assert!(!after.is_loading);
        assert_eq!(mock.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_changed_config_reaches_platform() {
        let mock = MockConverter::new();
        let handle = handle_with(&mock, Some("/tmp/photo.png"));
        handle.convert().await;
        assert_eq!(mock.last_request().unwrap().quality, 80.0);

        handle
            .change_config(WebpConfig::new(35.0, CompressionType::Lossless).with_preset(Preset::Icon))
            .await;

        let request = mock.last_request().unwrap();
        assert_eq!(request.quality, 35.0);
        assert_eq!(request.compression, CompressionType::Lossless);
        assert_eq!(request.preset, Preset::Icon);
        assert_eq!(mock.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_convert_with_sets_path_and_config() {
        let mock = MockConverter::new();
        let handle = handle_with(&mock, None);

        handle
            .convert_with("/tmp/drawing.bmp", WebpConfig::new(60.0, CompressionType::Lossy))
            .await;

        let request = mock.last_request().unwrap();
        assert_eq!(request.input_path, "/tmp/drawing.bmp");
        assert_eq!(request.output_path, "/tmp/drawing.webp");
        assert_eq!(request.quality, 60.0);
        assert_eq!(handle.input_path().as_deref(), Some("/tmp/drawing.bmp"));
        assert_eq!(handle.config().quality, 60.0);
    }

    #[tokio::test]
    async fn test_mount_converts_immediately() {
        let mock = MockConverter::new();
        let handle = ConverterHandle::mount(
            WebpConverter::new(Binding::direct(Arc::new(mock.clone()))),
            Some("/tmp/a.png".to_string()),
            WebpConfig::default(),
        )
        .await;

        assert_eq!(mock.get_call_count(), 1);
        assert_eq!(handle.state().uri.as_deref(), Some("/tmp/a.webp"));
    }
}
