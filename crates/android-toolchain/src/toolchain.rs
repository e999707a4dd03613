//! Toolchain Records
//!
//! The compiler/linker profile produced for one NDK target, plus the
//! tool kinds and compilation modes it refers to.

use serde::{Deserialize, Serialize};

/// A binutils/compiler tool a toolchain provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Ar,
    Cpp,
    Dwp,
    Gcc,
    Gcov,
    GcovTool,
    Ld,
    Nm,
    Objcopy,
    Objdump,
    Strip,
}

impl Tool {
    /// Suffix of the tool binary after the target platform prefix
    pub fn name_part(&self) -> &'static str {
        match self {
            Tool::Ar => "ar",
            Tool::Cpp => "cpp",
            Tool::Dwp => "dwp",
            Tool::Gcc => "gcc",
            Tool::Gcov => "gcov",
            Tool::GcovTool => "gcov-tool",
            Tool::Ld => "ld",
            Tool::Nm => "nm",
            Tool::Objcopy => "objcopy",
            Tool::Objdump => "objdump",
            Tool::Strip => "strip",
        }
    }

    /// All tools, in the order toolchains list them
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Ar,
            Tool::Cpp,
            Tool::Dwp,
            Tool::Gcc,
            Tool::Gcov,
            Tool::GcovTool,
            Tool::Ld,
            Tool::Nm,
            Tool::Objcopy,
            Tool::Objdump,
            Tool::Strip,
        ]
    }
}

/// Location of one tool inside the NDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPath {
    pub tool: Tool,
    pub path: String,
}

impl ToolPath {
    pub fn new(tool: Tool, path: impl Into<String>) -> Self {
        Self { tool, path: path.into() }
    }
}

/// Compilation mode a flag overlay applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompilationMode {
    /// Release
    Opt,
    /// Debug
    Dbg,
}

impl CompilationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilationMode::Opt => "OPT",
            CompilationMode::Dbg => "DBG",
        }
    }

    pub fn all() -> &'static [CompilationMode] {
        &[CompilationMode::Opt, CompilationMode::Dbg]
    }
}

/// Extra compiler flags per compilation mode.
///
/// There is always exactly one list for `OPT` and one for `DBG`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationModeFlags {
    pub opt: Vec<String>,
    pub dbg: Vec<String>,
}

impl CompilationModeFlags {
    pub fn new(opt: &[&str], dbg: &[&str]) -> Self {
        Self {
            opt: to_owned_flags(opt),
            dbg: to_owned_flags(dbg),
        }
    }

    /// Flags applied on top of the unconditional compiler flags for `mode`
    pub fn get(&self, mode: CompilationMode) -> &[String] {
        match mode {
            CompilationMode::Opt => &self.opt,
            CompilationMode::Dbg => &self.dbg,
        }
    }
}

/// Compiler and linker profile for one NDK target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Unique key, e.g. `arm-linux-androideabi-4.9-v7a-hard-thumb`
    pub toolchain_identifier: String,
    /// GNU target triple prefix
    pub target_system_name: String,
    /// CPU/ABI tag, e.g. `armeabi-v7a`
    pub target_cpu: String,
    /// Compiler label, e.g. `gcc-4.9`
    pub compiler: String,
    pub tool_paths: Vec<ToolPath>,
    pub cxx_builtin_include_directories: Vec<String>,
    pub builtin_sysroot: String,
    pub supports_embedded_runtimes: bool,
    pub static_runtimes_filegroup: String,
    pub dynamic_runtimes_filegroup: String,
    /// Applied unconditionally, order preserved
    pub compiler_flags: Vec<String>,
    /// Applied unconditionally, order preserved
    pub linker_flags: Vec<String>,
    pub compilation_mode_flags: CompilationModeFlags,
}

impl ToolchainConfig {
    /// Path of a tool, if the toolchain provides it
    pub fn tool_path(&self, tool: Tool) -> Option<&str> {
        self.tool_paths
            .iter()
            .find(|tp| tp.tool == tool)
            .map(|tp| tp.path.as_str())
    }

    pub fn mode_flags(&self, mode: CompilationMode) -> &[String] {
        self.compilation_mode_flags.get(mode)
    }

    pub(crate) fn add_compiler_flags<S: AsRef<str>>(&mut self, flags: &[S]) {
        self.compiler_flags
            .extend(flags.iter().map(|f| f.as_ref().to_string()));
    }

    pub(crate) fn add_linker_flags<S: AsRef<str>>(&mut self, flags: &[S]) {
        self.linker_flags
            .extend(flags.iter().map(|f| f.as_ref().to_string()));
    }
}

fn to_owned_flags(flags: &[&str]) -> Vec<String> {
    flags.iter().map(|f| f.to_string()).collect()
}
