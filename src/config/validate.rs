use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.max_connections == 0 {
            errors.push("database.max_connections must be > 0".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if cfg.lists.default_page_size == 0 {
        errors.push("lists.default_page_size must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, DatabaseConfig, EnvConfig};

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_violation() {
        let mut cfg = AppConfig::default();
        cfg.general.host = "  ".to_string();
        cfg.lists.default_page_size = 0;
        cfg.database = Some(DatabaseConfig {
            url: String::new(),
            max_connections: 2,
            min_idle: 5,
        });

        let err = validate(&cfg).expect_err("config should be rejected");
        let message = err.to_string();

        assert!(message.contains("general.host must not be empty"));
        assert!(message.contains("database.url must not be empty"));
        assert!(message.contains("database.min_idle (5) must be <= database.max_connections (2)"));
        assert!(message.contains("lists.default_page_size must be > 0"));
    }

    #[test]
    fn overrides_are_applied_and_validated() {
        let cfg = AppConfig::from_env_with_overrides(&[
            ("database.url", "sqlite::memory:"),
            ("lists.default_page_size", "10"),
        ])
        .expect("overrides should load");

        assert_eq!(
            cfg.database.as_ref().map(|db| db.url.as_str()),
            Some("sqlite::memory:")
        );
        assert_eq!(cfg.lists.default_page_size, 10);

        let err = AppConfig::from_env_with_overrides(&[("lists.default_page_size", "0")])
            .expect_err("zero page size should fail validation");
        assert!(format!("{err:#}").contains("lists.default_page_size"));
    }
}
