//! Configuration system
//!
//! Tolerances and iteration caps for the narrow-phase queries live in
//! [`QueryConfig`], which can be loaded from `.toml` or `.ron` files.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// File formats a configuration can be stored in, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn from_path(path: &str) -> Result<Self, ConfigError> {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match Format::from_path(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| e.to_string()),
        }
        .map_err(ConfigError::Serialize)?;

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its valid range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Tolerances and iteration caps for narrow-phase queries
///
/// The defaults are the values the queries were tuned with; tighter caps trade
/// precision for worst-case latency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Absolute GJK termination tolerance, relative to the largest simplex vertex
    pub gjk_tolerance: f32,

    /// GJK relative error bound on the squared distance
    pub gjk_relative_error: f32,

    /// Hard iteration cap for the GJK distance query
    pub gjk_max_iterations: u32,

    /// Portal-to-support-plane distance below which a portal is on the boundary
    pub mpr_tolerance: f32,

    /// Refinement cap for the boolean MPR test
    pub mpr_max_refinements: u32,

    /// Refinement cap for MPR penetration resolution
    pub penetration_max_refinements: u32,

    /// Iteration cap for the GJK ray cast
    pub ray_cast_max_iterations: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            gjk_tolerance: 1e-6,
            gjk_relative_error: 1e-3,
            gjk_max_iterations: 10_000,
            mpr_tolerance: 0.01,
            mpr_max_refinements: 16,
            penetration_max_refinements: 256,
            ray_cast_max_iterations: 64,
        }
    }
}

impl Config for QueryConfig {}

impl QueryConfig {
    /// Check that every tolerance is positive and finite and every cap non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerances = [
            ("gjk_tolerance", self.gjk_tolerance),
            ("gjk_relative_error", self.gjk_relative_error),
            ("mpr_tolerance", self.mpr_tolerance),
        ];
        for (field, value) in tolerances {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, reason: "must be positive and finite" });
            }
        }

        let caps = [
            ("gjk_max_iterations", self.gjk_max_iterations),
            ("mpr_max_refinements", self.mpr_max_refinements),
            ("penetration_max_refinements", self.penetration_max_refinements),
            ("ray_cast_max_iterations", self.ray_cast_max_iterations),
        ];
        for (field, value) in caps {
            if value == 0 {
                return Err(ConfigError::Invalid { field, reason: "must be at least 1" });
            }
        }

        Ok(())
    }

    /// Load from file and validate
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
