use anyhow::{bail, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::flash::FlashTemplate;

pub const CONFIG_FILE: &str = ".fatflash.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashConfig>,
}

/// `[flash]` table. Every field is optional; unset fields keep the defaults.
/// Baud rate and flash offset are fixed and have no entry here.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FlashConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl FlashConfig {
    pub fn from_template(template: &FlashTemplate) -> Self {
        Self {
            interpreter: Some(template.interpreter.clone()),
            image: Some(template.image.clone()),
        }
    }

    /// Command line values win over the file, the file wins over defaults.
    pub fn merge_cli(mut self, interpreter: Option<String>, image: Option<PathBuf>) -> Self {
        if interpreter.is_some() {
            self.interpreter = interpreter;
        }
        if image.is_some() {
            self.image = image;
        }
        self
    }

    pub fn into_template(self) -> FlashTemplate {
        let mut template = FlashTemplate::default();
        if let Some(interpreter) = self.interpreter {
            template.interpreter = interpreter;
        }
        if let Some(image) = self.image {
            template.image = image;
        }
        template
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path` if present. A broken file is reported and skipped.
    pub fn load_optional(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(cfg) => {
                let abs_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
                info!("Using configuration file: {}", abs_path.display());
                Some(cfg)
            }
            Err(e) => {
                error!("Failed to load configuration file: {}, using defaults", e);
                None
            }
        }
    }

    pub fn generate_config_file(path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            bail!(
                "Configuration file {} already exists. Use --force to overwrite.",
                path.display()
            );
        }

        fs::write(path, Self::generate_full_config()?)?;

        info!("Configuration file generated: {}", path.display());
        info!("Please edit this file to customize configuration");
        Ok(())
    }

    pub fn generate_full_config() -> Result<String> {
        let config = AppConfig {
            flash: Some(FlashConfig::from_template(&FlashTemplate::default())),
        };
        let toml_content = toml::to_string_pretty(&config)?;
        Ok(format!(
            "# fatflash configuration file\n# All fields are optional, command line arguments override config file values\n\n{}",
            toml_content
        ))
    }
}
