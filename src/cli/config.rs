//! leakcheck configuration file handling
//!
//! Provides default configuration generation and loading. Configuration
//! files are TOML.
//!
//! ## Domain parameters
//!
//! The `[protocol]` section holds the values both parties must agree on
//! out-of-band before a session (curve, Paillier key size, hash-to-curve
//! retry cap). A client and server with different values will simply find
//! no matches, or fail to validate each other's points.

use leakcheck::curve::{CurveName, DEFAULT_HASH_TO_CURVE_ATTEMPTS};
use leakcheck::paillier::DEFAULT_KEY_BITS;
use leakcheck::ProtocolConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// leakcheck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeakcheckConfig {
    /// Protocol domain parameters
    #[serde(default)]
    pub protocol: ProtocolSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Protocol parameters as written in the TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolSection {
    /// Curve name: "sm2p256v1" or "secp256k1"
    #[serde(default)]
    pub curve: CurveName,

    /// Paillier modulus size in bits
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,

    /// Re-hash cap for hash-to-curve
    #[serde(default = "default_hash_to_curve_attempts")]
    pub hash_to_curve_attempts: u32,

    /// Per-round timeout, humantime format ("30s", "2m")
    pub round_timeout: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}

fn default_hash_to_curve_attempts() -> u32 {
    DEFAULT_HASH_TO_CURVE_ATTEMPTS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            curve: CurveName::default(),
            key_bits: DEFAULT_KEY_BITS,
            hash_to_curve_attempts: DEFAULT_HASH_TO_CURVE_ATTEMPTS,
            round_timeout: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl ProtocolSection {
    /// Library protocol config, parsing the timeout
    pub fn to_protocol_config(&self) -> Result<ProtocolConfig, Box<dyn std::error::Error>> {
        let round_timeout = self
            .round_timeout
            .as_deref()
            .map(humantime::parse_duration)
            .transpose()
            .map_err(|e| format!("Invalid round_timeout: {}", e))?;

        Ok(ProtocolConfig {
            curve: self.curve,
            key_bits: self.key_bits,
            hash_to_curve_attempts: self.hash_to_curve_attempts,
            round_timeout,
        })
    }
}

impl LeakcheckConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: LeakcheckConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load from an explicit path, else the default path if it exists,
    /// else built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# leakcheck configuration
#
# [protocol] values are DOMAIN PARAMETERS: the client and the breach server
# must use identical values, agreed out-of-band before any session.

[protocol]
# Curve: "sm2p256v1" or "secp256k1"
curve = "sm2p256v1"

# Paillier modulus size in bits (even, >= 256)
key_bits = {key_bits}

# Hash-to-curve re-hash cap; each attempt fails with probability ~1/2
hash_to_curve_attempts = {attempts}

# Abort any protocol round that runs longer than this (optional)
# round_timeout = "30s"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/leakcheck/leakcheck.log"
"#,
            key_bits = DEFAULT_KEY_BITS,
            attempts = DEFAULT_HASH_TO_CURVE_ATTEMPTS,
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Default config location: ~/.config/leakcheck/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leakcheck")
        .join("config.toml")
}
