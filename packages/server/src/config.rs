use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
    pub search: SearchIndexConfig,
    pub sync: SyncConfig,
    pub ai_service_url: Option<String>,
    pub ai_service_timeout: Duration,
}

/// Connection settings for the Meilisearch dictionary index.
///
/// When `url` is `None` the index is disabled and every search is served by
/// the Postgres fallback.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub index_name: String,
    pub timeout: Duration,
}

/// Sync propagator and reconciliation sweep settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub worker_concurrency: usize,
    pub reconcile_cron: String,
    pub reconcile_batch_size: i64,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            index_name: "dictionary".to_string(),
            timeout: Duration::from_millis(2000),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: 4,
            reconcile_cron: "0 */5 * * * *".to_string(),
            reconcile_batch_size: 200,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let search_defaults = SearchIndexConfig::default();
        let sync_defaults = SyncConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8080)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "vsl-platform".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or_else(|_| vec!["*".to_string()]),
            search: SearchIndexConfig {
                url: non_empty_var("MEILISEARCH_URL"),
                api_key: non_empty_var("MEILISEARCH_API_KEY"),
                index_name: env::var("MEILISEARCH_INDEX").unwrap_or(search_defaults.index_name),
                timeout: Duration::from_millis(parse_or("SEARCH_INDEX_TIMEOUT_MS", 2000u64)?),
            },
            sync: SyncConfig {
                worker_concurrency: parse_or(
                    "SYNC_WORKER_CONCURRENCY",
                    sync_defaults.worker_concurrency,
                )?
                .max(1),
                reconcile_cron: env::var("RECONCILE_CRON")
                    .unwrap_or(sync_defaults.reconcile_cron),
                reconcile_batch_size: parse_or(
                    "RECONCILE_BATCH_SIZE",
                    sync_defaults.reconcile_batch_size,
                )?,
            },
            ai_service_url: non_empty_var("AI_SERVICE_URL"),
            ai_service_timeout: Duration::from_millis(parse_or("AI_SERVICE_TIMEOUT_MS", 10_000u64)?),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
