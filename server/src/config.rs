use anyhow::Result;
use platform_db::DatabaseSettings;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            database: DatabaseSettings::from_env(),
            cors_allowed_origins,
        })
    }

    /// Swaps the configured database for a private in-memory one.
    pub fn with_in_memory_database(mut self) -> Self {
        self.database = DatabaseSettings::in_memory();
        self
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn in_memory_override_replaces_database() {
        let config = AppConfig::default().with_in_memory_database();
        assert!(config.database.is_in_memory());
    }
}
