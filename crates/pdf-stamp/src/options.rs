use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PIXELS_PER_UNIT, MAX_RASTER_DIMENSION};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings shared by single-document and batch stamping
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StampOptions {
    /// Directory receiving generated documents
    pub output_dir: PathBuf,

    /// Raster pixels per document unit used when resampling the signature
    pub pixels_per_unit: f32,

    /// Replace existing outputs instead of picking a fresh `_N` name
    pub overwrite: bool,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            overwrite: false,
        }
    }
}

impl StampOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| StampError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StampError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(StampError::Config(
                "Output directory must not be empty".to_string(),
            ));
        }

        if !self.pixels_per_unit.is_finite() || self.pixels_per_unit <= 0.0 {
            return Err(StampError::Config(format!(
                "Pixels per unit must be positive, got {}",
                self.pixels_per_unit
            )));
        }

        if self.pixels_per_unit > MAX_RASTER_DIMENSION as f32 {
            return Err(StampError::Config(format!(
                "Pixels per unit {} is unreasonably large",
                self.pixels_per_unit
            )));
        }

        Ok(())
    }
}
