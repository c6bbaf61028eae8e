//! HTTP clients for the external classification and translation services.
pub mod inference;
pub mod translator;

pub use inference::{InferenceClient, InferenceClientConfig};
pub use translator::{LibreTranslateClient, LibreTranslateConfig};
