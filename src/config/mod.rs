//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    num::{NonZeroU32, NonZeroUsize},
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::MAX_ARTICLE_LIST_LIMIT;

mod cli;

pub use cli::*;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "blogstats";
const ENV_PREFIX: &str = "BLOGSTATS";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_DB_QUERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ARTICLE_LIST_TTL_SECS: u64 = 60;
const DEFAULT_ARTICLE_LIST_LIMIT: u64 = 5;
const DEFAULT_STATS_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1_000;
const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_BLOG_BY_USER_CATEGORY: &str = "Blog posts by $1";
const DEFAULT_BLOG_BY_USER: &str = "Blog by user $1";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub messages: MessagesSettings,
    pub profile: ProfileSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
    /// Upper bound on every backing-store call.
    pub query_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub article_list_ttl: Duration,
    pub article_list_limit: NonZeroUsize,
    pub stats_ttl: Duration,
    pub max_entries: NonZeroUsize,
}

/// Content-language message overrides.
#[derive(Debug, Clone)]
pub struct MessagesSettings {
    pub blog_by_user_category: String,
    pub blog_by_user: String,
}

#[derive(Debug, Clone)]
pub struct ProfileSettings {
    pub show_articles: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_cli(cli);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    cache: RawCacheSettings,
    messages: RawMessagesSettings,
    profile: RawProfileSettings,
}

impl RawSettings {
    fn apply_cli(&mut self, cli: &CliArgs) {
        self.apply_logging_overrides(&cli.logging);

        match &cli.command {
            Command::Recompute(args) => self.apply_database_override(&args.database),
            Command::Recent(args) => self.apply_database_override(&args.database),
            Command::Profile(args) => {
                self.apply_database_override(&args.user.database);
                if let Some(show) = args.show_articles {
                    self.profile.show_articles = Some(show);
                }
            }
            Command::Migrate(args) => self.apply_database_override(&args.database),
        }
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(max) = overrides.max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.database.query_timeout_ms = Some(timeout);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            database,
            cache,
            messages,
            profile,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            cache: build_cache_settings(cache)?,
            messages: build_messages_settings(messages)?,
            profile: ProfileSettings {
                show_articles: profile.show_articles.unwrap_or(true),
            },
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_connections = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = non_zero_u32(max_connections.into(), "database.max_connections")?;

    let timeout_ms = database
        .query_timeout_ms
        .unwrap_or(DEFAULT_DB_QUERY_TIMEOUT_MS);
    if timeout_ms == 0 {
        return Err(LoadError::invalid(
            "database.query_timeout_ms",
            "must be greater than zero",
        ));
    }

    Ok(DatabaseSettings {
        url,
        max_connections,
        query_timeout: Duration::from_millis(timeout_ms),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let article_list_ttl = cache_ttl(
        cache
            .article_list_ttl_seconds
            .unwrap_or(DEFAULT_ARTICLE_LIST_TTL_SECS),
        "cache.article_list_ttl_seconds",
    )?;
    let stats_ttl = cache_ttl(
        cache.stats_ttl_seconds.unwrap_or(DEFAULT_STATS_TTL_SECS),
        "cache.stats_ttl_seconds",
    )?;

    let article_list_limit = non_zero_usize(
        cache
            .article_list_limit
            .unwrap_or(DEFAULT_ARTICLE_LIST_LIMIT),
        "cache.article_list_limit",
    )?;
    if article_list_limit.get() > MAX_ARTICLE_LIST_LIMIT {
        return Err(LoadError::invalid(
            "cache.article_list_limit",
            format!("must not exceed {MAX_ARTICLE_LIST_LIMIT}"),
        ));
    }

    let max_entries = non_zero_usize(
        cache.max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
        "cache.max_entries",
    )?;

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        article_list_ttl,
        article_list_limit,
        stats_ttl,
        max_entries,
    })
}

fn cache_ttl(seconds: u64, key: &'static str) -> Result<Duration, LoadError> {
    if seconds == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    if seconds > MAX_CACHE_TTL_SECS {
        return Err(LoadError::invalid(
            key,
            format!("must not exceed {MAX_CACHE_TTL_SECS} seconds"),
        ));
    }
    Ok(Duration::from_secs(seconds))
}

fn build_messages_settings(messages: RawMessagesSettings) -> Result<MessagesSettings, LoadError> {
    let blog_by_user_category = messages
        .blog_by_user_category
        .unwrap_or_else(|| DEFAULT_BLOG_BY_USER_CATEGORY.to_string());
    if blog_by_user_category.matches("$1").count() != 1 {
        return Err(LoadError::invalid(
            "messages.blog_by_user_category",
            "must contain the `$1` placeholder exactly once",
        ));
    }

    let blog_by_user = messages
        .blog_by_user
        .unwrap_or_else(|| DEFAULT_BLOG_BY_USER.to_string());

    Ok(MessagesSettings {
        blog_by_user_category,
        blog_by_user,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
    query_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    article_list_ttl_seconds: Option<u64>,
    article_list_limit: Option<u64>,
    stats_ttl_seconds: Option<u64>,
    max_entries: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMessagesSettings {
    blog_by_user_category: Option<String>,
    blog_by_user: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawProfileSettings {
    show_articles: Option<bool>,
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

fn non_zero_usize(value: u64, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    let value_usize: usize = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for usize"))?;
    NonZeroUsize::new(value_usize).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
