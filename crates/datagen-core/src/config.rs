//! Configuration schema (datagen.toml)

use serde::{Deserialize, Serialize};

/// Builtin type names available to every schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypesConfig {
    /// Names that resolve to primitive types
    #[serde(default = "default_primitives")]
    pub primitives: Vec<String>,

    /// Name that resolves to the blob type
    #[serde(default = "default_blob")]
    pub blob: String,
}

fn default_primitives() -> Vec<String> {
    ["bool", "int", "long", "float", "double", "string", "date", "object_id"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_blob() -> String {
    "blob".to_string()
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            primitives: default_primitives(),
            blob: default_blob(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Store property keys in lowerCamelCase
    #[serde(default)]
    pub camel_case_keys: bool,

    /// Suppress the registered-type listing after registration
    #[serde(default)]
    pub quiet: bool,

    /// Builtin types
    #[serde(default)]
    pub types: TypesConfig,
}

impl CompilerConfig {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config.types.primitives.iter().any(|p| p == &config.types.blob) {
            return Err(ConfigError::InvalidBuiltins(config.types.blob));
        }

        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Set the naming-convention flag
    pub fn with_camel_case_keys(mut self, camel_case_keys: bool) -> Self {
        self.camel_case_keys = camel_case_keys;
        self
    }

    /// Set quiet mode
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Builtin name '{0}' is declared as both a primitive and the blob type")]
    InvalidBuiltins(String),
}
