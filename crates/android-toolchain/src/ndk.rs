//! NDK Paths
//!
//! Names the files of an Android NDK checkout that toolchain records point
//! at: tool binaries, builtin include directories, sysroots and the gcc
//! toolchain roots clang is told about.

use std::collections::BTreeSet;
use tracing::trace;

use crate::toolchain::{Tool, ToolPath};

/// NDK path errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdkError {
    #[error("Unsupported host platform: {0}")]
    UnsupportedHostPlatform(String),
    #[error("API level {api_level} is not supported for arch-{arch} (minimum {minimum})")]
    UnsupportedApiLevel {
        arch: String,
        api_level: u32,
        minimum: u32,
    },
    #[error("Unknown architecture: {0}")]
    UnknownArch(String),
    #[error("Invalid {0}: must not be empty")]
    InvalidName(&'static str),
}

/// Host platforms NDK r10e ships prebuilt toolchains for
pub const HOST_PLATFORMS: &[&str] = &["linux-x86_64", "darwin-x86_64", "windows-x86_64", "windows"];

/// Oldest platform level carrying the 64-bit sysroots
const MIN_64_BIT_API_LEVEL: u32 = 21;

/// Path-naming service the crosstool builders delegate to.
///
/// Implementations must be deterministic: the same arguments always name
/// the same paths, in the same order.
pub trait NdkPaths {
    /// Tool paths for a gcc toolchain, minus `excluded`
    fn tool_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        excluded: &BTreeSet<Tool>,
    ) -> Result<Vec<ToolPath>, NdkError>;

    /// Tool paths where the compiler driver is clang `clang_version` and the
    /// remaining tools come from the gcc toolchain
    fn clang_tool_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        clang_version: &str,
        excluded: &BTreeSet<Tool>,
    ) -> Result<Vec<ToolPath>, NdkError>;

    /// Builtin include directories of a gcc toolchain
    fn toolchain_include_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        gcc_version: &str,
    ) -> Result<Vec<String>, NdkError>;

    /// Sysroot for an `arch-*` tag such as `arm` or `arm64`
    fn builtin_sysroot(&self, arch: &str) -> Result<String, NdkError>;

    /// Root of a gcc toolchain, passed to clang via `-gcc-toolchain`
    fn gcc_toolchain_path(&self, toolchain_name: &str) -> Result<String, NdkError>;
}

/// Paths of an NDK checkout mounted as an external repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdkLayout {
    repository_name: String,
    host_platform: String,
    api_level: u32,
}

impl NdkLayout {
    /// Create a layout for an NDK repository
    pub fn new(
        repository_name: impl Into<String>,
        host_platform: impl Into<String>,
        api_level: u32,
    ) -> Result<Self, NdkError> {
        let repository_name = repository_name.into();
        let host_platform = host_platform.into();

        non_empty(&repository_name, "repository name")?;
        if !HOST_PLATFORMS.contains(&host_platform.as_str()) {
            return Err(NdkError::UnsupportedHostPlatform(host_platform));
        }

        Ok(Self {
            repository_name,
            host_platform,
            api_level,
        })
    }

    /// Detect the host platform tag of the running machine
    pub fn detect_host_platform() -> &'static str {
        if cfg!(windows) {
            "windows-x86_64"
        } else if cfg!(target_os = "macos") {
            "darwin-x86_64"
        } else {
            "linux-x86_64"
        }
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn host_platform(&self) -> &str {
        &self.host_platform
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }

    fn ndk_root(&self) -> String {
        format!("external/{}/ndk", self.repository_name)
    }

    fn toolchain_root(&self, toolchain_name: &str) -> String {
        format!(
            "{}/toolchains/{}/prebuilt/{}",
            self.ndk_root(),
            toolchain_name,
            self.host_platform
        )
    }
}

impl NdkPaths for NdkLayout {
    fn tool_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        excluded: &BTreeSet<Tool>,
    ) -> Result<Vec<ToolPath>, NdkError> {
        non_empty(toolchain_name, "toolchain name")?;
        non_empty(target_platform, "target platform")?;

        let bin = format!("{}/bin", self.toolchain_root(toolchain_name));
        let paths: Vec<ToolPath> = Tool::all()
            .iter()
            .filter(|tool| !excluded.contains(*tool))
            .map(|tool| {
                ToolPath::new(
                    *tool,
                    format!("{}/{}-{}", bin, target_platform, tool.name_part()),
                )
            })
            .collect();

        trace!("{} tool paths for {}", paths.len(), toolchain_name);
        Ok(paths)
    }

    fn clang_tool_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        clang_version: &str,
        excluded: &BTreeSet<Tool>,
    ) -> Result<Vec<ToolPath>, NdkError> {
        non_empty(clang_version, "clang version")?;

        // gcc is swapped out for the clang driver
        let mut excluded = excluded.clone();
        excluded.insert(Tool::Gcc);

        let mut paths = self.tool_paths(toolchain_name, target_platform, &excluded)?;
        paths.push(ToolPath::new(
            Tool::Gcc,
            format!(
                "{}/toolchains/llvm-{}/prebuilt/{}/bin/clang",
                self.ndk_root(),
                clang_version,
                self.host_platform
            ),
        ));
        Ok(paths)
    }

    fn toolchain_include_paths(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        gcc_version: &str,
    ) -> Result<Vec<String>, NdkError> {
        non_empty(toolchain_name, "toolchain name")?;
        non_empty(target_platform, "target platform")?;
        non_empty(gcc_version, "gcc version")?;

        let gcc_lib = format!(
            "{}/lib/gcc/{}/{}",
            self.toolchain_root(toolchain_name),
            target_platform,
            gcc_version
        );
        Ok(vec![
            format!("{}/include", gcc_lib),
            format!("{}/include-fixed", gcc_lib),
        ])
    }

    fn builtin_sysroot(&self, arch: &str) -> Result<String, NdkError> {
        let minimum = match arch {
            "arm" | "mips" | "x86" => 0,
            "arm64" | "mips64" | "x86_64" => MIN_64_BIT_API_LEVEL,
            other => return Err(NdkError::UnknownArch(other.to_string())),
        };

        if self.api_level < minimum {
            return Err(NdkError::UnsupportedApiLevel {
                arch: arch.to_string(),
                api_level: self.api_level,
                minimum,
            });
        }

        Ok(format!(
            "{}/platforms/android-{}/arch-{}",
            self.ndk_root(),
            self.api_level,
            arch
        ))
    }

    fn gcc_toolchain_path(&self, toolchain_name: &str) -> Result<String, NdkError> {
        non_empty(toolchain_name, "toolchain name")?;
        Ok(self.toolchain_root(toolchain_name))
    }
}

fn non_empty(value: &str, what: &'static str) -> Result<(), NdkError> {
    if value.is_empty() {
        Err(NdkError::InvalidName(what))
    } else {
        Ok(())
    }
}
