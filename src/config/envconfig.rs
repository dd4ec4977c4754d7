use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Loads a config struct from `APP_`-prefixed environment variables.
///
/// Nested keys use `__`, e.g. `APP_DATABASE__URL` or `APP_LISTS__DEFAULT_PAGE_SIZE`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn load_dotenv() {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::from_env_with_overrides(&[])
    }

    /// Same as [`EnvConfig::from_env`] without reading `.env`, with explicit
    /// `key = value` overrides (dotted keys, e.g. `database.url`) applied last.
    fn from_env_with_overrides(overrides: &[(&str, &str)]) -> Result<Self> {
        let mut builder = config_rs::Config::builder().add_source(
            config_rs::Environment::with_prefix(Self::PREFIX)
                .prefix_separator("_")
                .separator(Self::SEPARATOR)
                .try_parsing(true),
        );

        for (key, value) in overrides {
            builder = builder
                .set_override(*key, *value)
                .with_context(|| format!("invalid config override for {key}"))?;
        }

        let settings = builder
            .build()
            .context("failed to read environment variables for config")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
