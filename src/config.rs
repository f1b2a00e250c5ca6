use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub split: SplitConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SplitConfig {
    pub holdout_fraction: f64,
    pub test_fraction_of_holdout: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.3,
            test_fraction_of_holdout: 0.5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_bayes_max_iterations")]
    pub bayes_max_iterations: usize,
    #[serde(default = "default_bayes_tolerance")]
    pub bayes_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            bayes_max_iterations: default_bayes_max_iterations(),
            bayes_tolerance: default_bayes_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_max_iterations() -> u32 {
    1000
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_bayes_max_iterations() -> usize {
    300
}

fn default_bayes_tolerance() -> f64 {
    1e-3
}

fn config_path() -> PathBuf {
    std::env::var("SRL_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/default.toml"))
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("holdout_fraction", self.holdout_fraction),
            ("test_fraction_of_holdout", self.test_fraction_of_holdout),
        ] {
            if !(value > 0.0 && value < 1.0) {
                bail!("split.{} must be in (0, 1), got {}", name, value);
            }
        }
        Ok(())
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 || self.bayes_max_iterations == 0 {
            bail!("solver iteration limits must be > 0");
        }
        if !(self.tolerance > 0.0) || !(self.bayes_tolerance > 0.0) {
            bail!("solver tolerances must be > 0");
        }
        Ok(())
    }
}

impl LoggingConfig {
    /// Accepts a level (`info`) or comma-separated `target=level` directives.
    pub fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        for directive in self.level.split(',') {
            let level = directive.rsplit_once('=').map_or(directive, |(_, l)| l).trim();
            level
                .parse::<LevelFilter>()
                .with_context(|| format!("logging.level has unknown level '{}'", level))?;
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("failed to parse config toml")?;
        config.split.validate().context("split section is invalid")?;
        config
            .solver
            .validate()
            .context("solver section is invalid")?;
        config
            .logging
            .validate()
            .context("logging section is invalid")?;
        if config.server.max_upload_bytes == 0 {
            bail!("server.max_upload_bytes must be > 0");
        }
        Ok(config)
    }
}
