//! Converter configuration
//!
//! Configuration can be provided via:
//! - CLI arguments (`--input`, `--output`, `--mapping`, ...)
//! - Environment variables (`J2A_CONVERT_INPUT`, ...)
//! - Default values
//!
//! # Example
//!
//! ```no_run
//! use j2a_convert::ConvertConfig;
//!
//! let config = ConvertConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Converting {} into {}", config.input.display(), config.output.display());
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::convert::ConvertOptions;
use crate::error::ConfigError;
use crate::mapping::MappingTable;

/// Converter configuration loaded from CLI args and environment variables
#[derive(Debug, Clone, Parser)]
#[command(
    name = "j2a-convert",
    about = "Convert legacy .j2a animation archives into sprite containers and wave files",
    version
)]
pub struct ConvertConfig {
    /// Path to the .j2a archive
    #[arg(long, short, env = "J2A_CONVERT_INPUT")]
    pub input: PathBuf,

    /// Directory that receives the `Animations/` tree
    #[arg(long, short, env = "J2A_CONVERT_OUTPUT", default_value = "./converted")]
    pub output: PathBuf,

    /// Path to the JSON mapping table
    #[arg(long, short, env = "J2A_CONVERT_MAPPING")]
    pub mapping: PathBuf,

    /// Accept archives of the plus extension
    #[arg(long, env = "J2A_CONVERT_ALLOW_PLUS")]
    pub allow_plus: bool,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, env = "J2A_CONVERT_LOG", default_value = "info")]
    pub log_level: String,
}

impl ConvertConfig {
    /// Parse configuration from command-line arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The input archive or mapping file doesn't exist
    /// - The output path exists but is not a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input.is_file() {
            return Err(ConfigError::MissingRequired(format!(
                "input archive not found: {}",
                self.input.display()
            )));
        }

        if !self.mapping.is_file() {
            return Err(ConfigError::MissingRequired(format!(
                "mapping file not found: {}",
                self.mapping.display()
            )));
        }

        if self.output.exists() && !self.output.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.output.clone(),
                reason: "output exists and is not a directory".to_string(),
            });
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::MissingRequired("log level".to_string()));
        }

        Ok(())
    }

    /// Conversion options, taking color tables from `mapping` when it has them
    pub fn options(&self, mapping: &MappingTable) -> ConvertOptions {
        let mut options = ConvertOptions::new().with_allow_plus(self.allow_plus);
        if let Some(palette) = mapping.menu_palette() {
            options = options.with_menu_palette(palette.clone());
        }
        if let Some(remap) = mapping.toaster_remap() {
            options = options.with_toaster_remap(remap.clone());
        }
        options
    }
}
