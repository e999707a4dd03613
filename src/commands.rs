//! CLI commands for the crosstool generator
//!
//! Provides command-line interface functionality for automation and scripting.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use ndk_crosstool_core::{GeneratorConfig, OutputFormat};
use ndk_crosstool_toolchain::{render_crosstool, target_cpus, ArmCrosstools, ToolchainConfig};

/// Toolchains as written to JSON and TOML files
#[derive(Serialize)]
struct ToolchainRelease<'a> {
    ndk_release: &'static str,
    toolchain: &'a [ToolchainConfig],
}

/// Build every toolchain record for the configured NDK checkout
pub fn create_toolchains(config: &GeneratorConfig) -> Result<Vec<ToolchainConfig>> {
    let layout = config.ndk_layout()?;
    debug!(
        "Using NDK repository {} ({}, android-{})",
        layout.repository_name(),
        layout.host_platform(),
        layout.api_level()
    );

    let toolchains = ArmCrosstools::new(&layout)
        .create_crosstools()
        .context("Failed to create ARM toolchains")?;
    Ok(toolchains)
}

/// Render toolchain records in an output format
pub fn render(toolchains: &[ToolchainConfig], format: OutputFormat) -> Result<String> {
    let release = ToolchainRelease {
        ndk_release: ndk_crosstool_toolchain::NDK_RELEASE,
        toolchain: toolchains,
    };

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&release)? + "\n",
        OutputFormat::Toml => toml::to_string_pretty(&release)?,
        OutputFormat::Crosstool => render_crosstool(toolchains),
    };
    Ok(text)
}

/// Generate command options
pub struct GenerateCommand {
    /// Settings for this run
    pub config: GeneratorConfig,
}

impl GenerateCommand {
    /// Execute the generate command, returning the rendered text when it
    /// was not written to a file
    pub async fn execute(&self) -> Result<Option<String>> {
        let toolchains = create_toolchains(&self.config)?;
        let format = self.config.output.format;
        let text = render(&toolchains, format)?;

        match &self.config.output.path {
            Some(path) => {
                write_output(path, &text).await?;
                info!(
                    "Wrote {} toolchains as {} to {:?}",
                    toolchains.len(),
                    format.as_str(),
                    path
                );
                Ok(None)
            }
            None => {
                info!("Generated {} toolchains", toolchains.len());
                Ok(Some(text))
            }
        }
    }
}

/// List command options
pub struct ListCommand {
    /// Settings for this run
    pub config: GeneratorConfig,
}

impl ListCommand {
    /// One line per toolchain: identifier, CPU and compiler
    pub fn execute(&self) -> Result<Vec<String>> {
        let toolchains = create_toolchains(&self.config)?;
        let width = toolchains
            .iter()
            .map(|t| t.toolchain_identifier.len())
            .max()
            .unwrap_or(0);
        let cpu_width = target_cpus().iter().map(|c| c.len()).max().unwrap_or(0);

        Ok(toolchains
            .iter()
            .map(|t| {
                format!(
                    "{:<width$}  {:<cpu_width$}  {}",
                    t.toolchain_identifier,
                    t.target_cpu,
                    t.compiler,
                    width = width,
                    cpu_width = cpu_width
                )
            })
            .collect())
    }
}

async fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
