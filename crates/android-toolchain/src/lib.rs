//! Android NDK Toolchains
//!
//! Generates the static compiler/linker profiles used to build native code
//! for Android:
//! - Toolchain records and their tool paths
//! - NDK path naming
//! - ARM (arm64-v8a, armeabi, armeabi-v7a, armeabi-v7a-hard) definitions
//! - CROSSTOOL text output

pub mod toolchain;
pub mod ndk;
pub mod arm;
pub mod crosstool;

pub use toolchain::{CompilationMode, CompilationModeFlags, Tool, ToolPath, ToolchainConfig};
pub use ndk::{NdkError, NdkLayout, NdkPaths};
pub use arm::{target_cpus, ArmCrosstools, CLANG_VERSIONS};
pub use crosstool::render_crosstool;

/// NDK release the definitions describe
pub const NDK_RELEASE: &str = "r10e";
