// Library exports for reuse by the CLI and integration tests
pub mod cli;
pub mod config_file;
pub mod conversion;
pub mod error;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use conversion::{ConversionDirection, ConversionEngine, SessionState, PNG_MIME, WEBP_MIME};
pub use error::{ConvertError, ConvertResult};
pub use json_output::JsonMessage;
