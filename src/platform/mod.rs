//! Platform conversion services
//!
//! The validator/dispatcher depends only on [`ConversionService`]. Concrete
//! adapters decode the source, encode WebP and write the result, or fail
//! in a well-defined way when no encoder is available.

pub mod mock;
pub mod native;
pub mod unlinked;

pub use mock::MockConverter;
pub use native::NativeConverter;
pub use unlinked::{UnlinkedConverter, LINKING_ERROR};

use crate::models::ConversionRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Encode `request.input_path` as WebP into `request.output_path`.
    ///
    /// Resolves with the path that was written.
    async fn convert_image_to_webp(&self, request: &ConversionRequest) -> Result<String>;
}
