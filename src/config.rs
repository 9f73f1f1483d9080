// =============================================================================
// CONFIGURATION - Load settings from vkprobe.toml
// =============================================================================
//
// This module handles loading and parsing configuration from vkprobe.toml.
// Provides sensible defaults if config file is missing or has errors.
//
// The requested validation layers live here and are handed to every check
// explicitly; nothing else holds a default layer list.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "vkprobe.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub report: ReportConfig,
    pub validation: ValidationConfig,
    pub extensions: ExtensionsConfig,
    pub shader: ShaderConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "vkprobe".to_string(),
        }
    }
}

/// Which listings to print
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub instance_extensions: bool,
    pub instance_layers: bool,
    pub device_extensions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            instance_extensions: true,
            instance_layers: true,
            device_extensions: true,
        }
    }
}

/// Validation layers to request when creating the instance
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub layers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layers: vec!["VK_LAYER_KHRONOS_validation".to_string()],
        }
    }
}

/// Extensions whose presence should be checked
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    pub instance: Vec<String>,
    pub device: Vec<String>,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            instance: Vec::new(),
            device: vec!["VK_KHR_swapchain".to_string()],
        }
    }
}

/// Optional SPIR-V file to turn into a shader module
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ShaderConfig {
    pub path: Option<PathBuf>,
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: String,
    pub log_to_file: bool,
    pub log_file: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
            log_file: "vkprobe.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Layers to request, or none when validation is switched off
    pub fn requested_layers(&self) -> &[String] {
        if self.validation.enabled {
            self.validation.layers.as_slice()
        } else {
            &[]
        }
    }

    /// Get log level as a `log` filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.debug.log_level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => {
                log::warn!(
                    "Unknown log level '{}', defaulting to info",
                    self.debug.log_level
                );
                log::LevelFilter::Info
            }
        }
    }
}
