//! Generator Configuration
//!
//! Settings for one generator run:
//! - Which NDK repository the paths point into
//! - Host platform and Android API level
//! - Output format and destination

use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ndk_crosstool_toolchain::NdkLayout;

use crate::error::{CrosstoolError, Result};

/// Oldest platform level the NDK ships a sysroot for
pub const MIN_API_LEVEL: u32 = 9;

/// NDK checkout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NdkConfig {
    /// External repository the NDK is mounted as
    pub repository_name: String,
    /// Prebuilt host tag, e.g. `linux-x86_64`
    pub host_platform: String,
    /// Android platform level of the sysroots
    pub api_level: u32,
}

impl Default for NdkConfig {
    fn default() -> Self {
        Self {
            repository_name: "androidndk".to_string(),
            host_platform: NdkLayout::detect_host_platform().to_string(),
            api_level: 21,
        }
    }
}

/// How generated toolchains are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Toml,
    #[default]
    Crosstool,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
            OutputFormat::Crosstool => "crosstool",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            "crosstool" => Ok(OutputFormat::Crosstool),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write here instead of stdout
    pub path: Option<PathBuf>,
}

/// Main generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub ndk: NdkConfig,
    pub output: OutputConfig,
}

impl GeneratorConfig {
    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("com", "rdroid", "ndk-crosstool")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults without creating one.
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| CrosstoolError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load the configuration from a file
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        debug!("Loading config from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        let config: GeneratorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Check the settings before they reach the NDK layout
    pub fn validate(&self) -> Result<()> {
        if self.ndk.repository_name.trim().is_empty() {
            return Err(CrosstoolError::Config(
                "ndk.repository_name must not be empty".into(),
            ));
        }
        if self.ndk.api_level < MIN_API_LEVEL {
            return Err(CrosstoolError::Config(format!(
                "ndk.api_level must be at least {}, got {}",
                MIN_API_LEVEL, self.ndk.api_level
            )));
        }
        Ok(())
    }

    /// Path naming for the configured NDK checkout
    pub fn ndk_layout(&self) -> Result<NdkLayout> {
        self.validate()?;
        Ok(NdkLayout::new(
            self.ndk.repository_name.clone(),
            self.ndk.host_platform.clone(),
            self.ndk.api_level,
        )?)
    }
}
