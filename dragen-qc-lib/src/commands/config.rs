use crate::Result;
use crate::ingest::{ConfiguredNames, NameCleaning};
use crate::metrics::CountUnits;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the current directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "dragen-qc.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Factor applied to read counts for display
    #[serde(default = "default_multiplier")]
    pub read_count_multiplier: f64,

    /// Title prefix for read counts
    #[serde(default = "default_read_prefix")]
    pub read_count_prefix: String,

    /// Factor applied to base counts for display
    #[serde(default = "default_multiplier")]
    pub base_count_multiplier: f64,

    /// Title prefix for base counts
    #[serde(default = "default_base_prefix")]
    pub base_count_prefix: String,

    #[serde(default)]
    pub sample_name_cleaning: NameCleaning,

    /// Regular expressions removed from sample names
    #[serde(default)]
    pub strip_patterns: Vec<String>,

    /// Regular expressions selecting samples to leave out
    #[serde(default)]
    pub ignore_samples: Vec<String>,

    /// Candidate files larger than this are skipped (bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

const fn default_multiplier() -> f64 {
    0.000_001
}

fn default_read_prefix() -> String {
    "M".to_string()
}

fn default_base_prefix() -> String {
    "Mb".to_string()
}

const fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading dragen-qc configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading dragen-qc configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a multiplier is not a positive finite number or a pattern does not compile
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("read_count_multiplier", self.read_count_multiplier),
            ("base_count_multiplier", self.base_count_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(app_err!("{name} must be a positive number, got {value}"));
            }
        }

        let _ = self.sample_names()?;
        Ok(())
    }

    #[must_use]
    pub fn count_units(&self) -> CountUnits {
        CountUnits {
            read_multiplier: self.read_count_multiplier,
            read_prefix: self.read_count_prefix.as_str().into(),
            base_multiplier: self.base_count_multiplier,
            base_prefix: self.base_count_prefix.as_str().into(),
        }
    }

    /// Build the sample-name policy
    ///
    /// # Errors
    ///
    /// Returns an error if a strip or ignore pattern is not a valid regular expression
    pub fn sample_names(&self) -> Result<ConfiguredNames> {
        ConfiguredNames::new(&self.strip_patterns, self.sample_name_cleaning, &self.ignore_samples)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
