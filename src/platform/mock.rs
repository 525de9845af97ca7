use super::ConversionService;
use crate::models::ConversionRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Records every request and answers with a scripted outcome.
#[derive(Clone)]
pub struct MockConverter {
    requests: Arc<Mutex<Vec<ConversionRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
    resolved_path: Option<String>,
    hold: Option<Arc<Notify>>,
}

impl MockConverter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            resolved_path: None,
            hold: None,
        }
    }

    /// Fail every call with `reason`, reported as a conversion error.
    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(reason.into());
        self
    }

    /// Resolve with a fixed path instead of echoing the request's output path.
    pub fn with_resolved_path(mut self, path: impl Into<String>) -> Self {
        self.resolved_path = Some(path.into());
        self
    }

    /// Record the request, then wait for `release` to be notified before answering.
    pub fn with_hold(mut self, release: Arc<Notify>) -> Self {
        self.hold = Some(release);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<ConversionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ConversionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversionService for MockConverter {
    async fn convert_image_to_webp(&self, request: &ConversionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(release) = &self.hold {
            release.notified().await;
        }

        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(Error::Conversion(reason));
        }

        Ok(self
            .resolved_path
            .clone()
            .unwrap_or_else(|| request.output_path.clone()))
    }
}
