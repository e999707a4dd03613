//! NDK Crosstool Core - shared error and configuration types
//!
//! Used by the generator binary and by anything embedding the generator.

pub mod config;
pub mod error;

pub use config::{GeneratorConfig, NdkConfig, OutputConfig, OutputFormat};
pub use error::{CrosstoolError, Result};

/// Generator version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "ndk-crosstool";
