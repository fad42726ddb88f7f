use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub paging: PagingConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let paging = PagingConfig {
            default_limit: env_or("MEALS_PAGE_LIMIT", 20),
            max_limit: env_or("MEALS_MAX_PAGE_LIMIT", 100),
        };
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            paging,
        })
    }
}

impl PagingConfig {
    /// Clamps a requested page size into `1..=max_limit`, falling back to
    /// the default when none was requested.
    pub fn limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}
