//! Gemini image-generation client.
//!
//! [`GeminiClient`] implements [`elfcast_core::transform::ImageTransformer`]
//! against the `generateContent` REST endpoint: one inline source image
//! plus a text prompt in, one inline image out.

pub mod client;
pub mod config;
pub mod messages;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigError};
