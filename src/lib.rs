//! ndk-crosstool - Android NDK toolchain definitions
//!
//! Generates the compiler/linker profiles a build system needs to compile
//! native code for ARM Android targets, one profile per compiler, CPU
//! variant and instruction mode.
//!
//! ## Architecture
//!
//! - `ndk-crosstool-core`: error type and generator configuration
//! - `ndk-crosstool-toolchain`: toolchain records, NDK path naming, the ARM
//!   definitions and the CROSSTOOL writer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use ndk_crosstool_core as core;
pub use ndk_crosstool_toolchain as toolchain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use ndk_crosstool_core::{GeneratorConfig, OutputFormat};
    pub use ndk_crosstool_toolchain::{ArmCrosstools, NdkLayout, NdkPaths, ToolchainConfig};
}
