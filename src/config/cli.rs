use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the blogstats binary.
#[derive(Debug, Parser)]
#[command(
    name = "blogstats",
    version,
    about = "Blog article counts and recent-article lists"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BLOGSTATS_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Recompute article counts for the owners of a saved page.
    Recompute(RecomputeArgs),
    /// Print a user's most recent blog articles as JSON.
    Recent(UserArgs),
    /// Print a user's profile articles section as JSON.
    Profile(ProfileArgs),
    /// Apply the migrations for tables owned by blogstats.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub max_connections: Option<u32>,

    /// Override the per-query timeout.
    #[arg(long = "database-query-timeout-ms", value_name = "MILLIS")]
    pub query_timeout_ms: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct RecomputeArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Page whose save is replayed.
    #[arg(long = "page-id", value_name = "ID")]
    pub page_id: i64,

    /// Name of the editor; omitted for anonymous edits.
    #[arg(long = "actor", value_name = "NAME")]
    pub actor: Option<String>,

    /// Title of the saved page, used in log output.
    #[arg(long = "title", value_name = "TITLE", default_value = "")]
    pub title: String,

    /// Namespace number of the saved page.
    #[arg(long = "namespace", value_name = "NUMBER", default_value_t = 500)]
    pub namespace: i32,
}

#[derive(Debug, Args, Clone)]
pub struct UserArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Id of the user account.
    #[arg(long = "user-id", value_name = "ID")]
    pub user_id: i64,

    /// Canonical name of the user account.
    #[arg(long = "user-name", value_name = "NAME")]
    pub user_name: String,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Override whether the profile shows the articles section.
    #[arg(
        long = "profile-show-articles",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub show_articles: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}
