//! WebP conversion behind a validated request boundary
//!
//! Caller-supplied paths and options are checked and normalized by
//! [`converter::WebpConverter`] before being handed to a platform
//! conversion service selected once through [`binding::Binding`].

pub mod app;
pub mod binding;
pub mod converter;
pub mod error;
pub mod hooks;
pub mod models;
pub mod platform;
pub mod utils;

pub use error::{Error, Result, ValidationError};
