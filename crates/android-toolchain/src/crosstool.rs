//! CROSSTOOL Writer
//!
//! Renders toolchain records as a CROSSTOOL text-protobuf release.

use crate::toolchain::{CompilationMode, ToolchainConfig};

const MAJOR_VERSION: &str = "android";

/// Render toolchains as CROSSTOOL text
pub fn render_crosstool(toolchains: &[ToolchainConfig]) -> String {
    let mut out = String::new();

    field(&mut out, 0, "major_version", MAJOR_VERSION);
    field(&mut out, 0, "minor_version", "");
    if let Some(first) = toolchains.first() {
        field(&mut out, 0, "default_target_cpu", &first.target_cpu);
    }

    for toolchain in toolchains {
        out.push('\n');
        render_toolchain(&mut out, toolchain);
    }

    out
}

fn render_toolchain(out: &mut String, toolchain: &ToolchainConfig) {
    out.push_str("toolchain {\n");

    field(out, 1, "toolchain_identifier", &toolchain.toolchain_identifier);
    field(out, 1, "target_system_name", &toolchain.target_system_name);
    field(out, 1, "target_cpu", &toolchain.target_cpu);
    field(out, 1, "compiler", &toolchain.compiler);

    for tool_path in &toolchain.tool_paths {
        out.push_str(&format!(
            "  tool_path {{ name: \"{}\" path: \"{}\" }}\n",
            tool_path.tool.name_part(),
            escape(&tool_path.path)
        ));
    }

    for dir in &toolchain.cxx_builtin_include_directories {
        field(out, 1, "cxx_builtin_include_directory", dir);
    }
    field(out, 1, "builtin_sysroot", &toolchain.builtin_sysroot);

    out.push_str(&format!(
        "  supports_embedded_runtimes: {}\n",
        toolchain.supports_embedded_runtimes
    ));
    field(out, 1, "static_runtimes_filegroup", &toolchain.static_runtimes_filegroup);
    field(out, 1, "dynamic_runtimes_filegroup", &toolchain.dynamic_runtimes_filegroup);

    for flag in &toolchain.compiler_flags {
        field(out, 1, "compiler_flag", flag);
    }
    for flag in &toolchain.linker_flags {
        field(out, 1, "linker_flag", flag);
    }

    for mode in CompilationMode::all() {
        out.push_str("  compilation_mode_flags {\n");
        out.push_str(&format!("    mode: {}\n", mode.as_str()));
        for flag in toolchain.mode_flags(*mode) {
            field(out, 2, "compiler_flag", flag);
        }
        out.push_str("  }\n");
    }

    out.push_str("}\n");
}

fn field(out: &mut String, depth: usize, name: &str, value: &str) {
    out.push_str(&format!(
        "{}{}: \"{}\"\n",
        "  ".repeat(depth),
        name,
        escape(value)
    ));
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
