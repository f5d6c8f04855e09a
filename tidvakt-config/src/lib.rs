//! # Tidvakt Configuration System
//!
//! Layered configuration for the simulator, the synthetic workload and
//! telemetry.
//!
//! ## Layers
//! 1. Built-in defaults
//! 2. `config/tidvakt.yaml`, if present
//! 3. `TIDVAKT_*` environment variables, `__` separating sections
//!    (e.g. `TIDVAKT_SIMULATOR__SCHEDULER=calendar`)
//!
//! Every layer is merged before validation, so a bad value in any of them
//! is reported with its full dotted path.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod simulator;
mod telemetry;
mod validation;
mod workload;

pub use error::ConfigError;
pub use simulator::{CalendarConfig, SimulatorConfig};
pub use telemetry::TelemetryConfig;
pub use workload::WorkloadConfig;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/tidvakt.yaml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "TIDVAKT_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct TidvaktConfig {
    #[serde(default)]
    #[validate(nested)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    #[validate(nested)]
    pub workload: WorkloadConfig,

    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl TidvaktConfig {
    /// Load configuration from the default file and the environment.
    ///
    /// A missing `config/tidvakt.yaml` is not an error; defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Self::defaults();
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        }
        Self::finish(figment)
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Self::finish(Self::defaults().merge(Yaml::file(path)))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(TidvaktConfig::default()))
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }
}
