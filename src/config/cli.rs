use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the Maher Bites binary.
#[derive(Debug, Parser)]
#[command(
    name = "maherbites",
    version,
    about = "Maher Snack & Cookies storefront server"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "MAHERBITES_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub auth: AuthOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the storefront HTTP service.
    Serve(Box<ServeArgs>),
    /// Insert the starter catalog once and exit.
    Seed(SeedArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SeedArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        hide_env_values = true,
        value_name = "URL"
    )]
    pub database_url: Option<String>,
}

/// Dashboard credentials; the bare variable names are accepted for existing deployments.
#[derive(Debug, Args, Default, Clone)]
pub struct AuthOverrides {
    /// Secret used to sign dashboard session tokens.
    #[arg(
        long = "jwt-secret",
        env = "JWT_SECRET",
        hide_env_values = true,
        value_name = "SECRET",
        global = true
    )]
    pub jwt_secret: Option<String>,
    /// Email address accepted by the dashboard login.
    #[arg(
        long = "admin-email",
        env = "EMAIL_APP",
        value_name = "EMAIL",
        global = true
    )]
    pub admin_email: Option<String>,
    /// Password accepted by the dashboard login.
    #[arg(
        long = "admin-password",
        env = "PASSWORD_APP",
        hide_env_values = true,
        value_name = "PASSWORD",
        global = true
    )]
    pub admin_password: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,
    /// Override the listener port.
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,
    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,
    /// Override the log level filter.
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
    /// Emit logs as JSON.
    #[arg(long = "log-json", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub log_json: Option<bool>,
    /// Override the database connection URL.
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        hide_env_values = true,
        value_name = "URL"
    )]
    pub database_url: Option<String>,
    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,
    /// Mark the session cookie `Secure`; pass `false` for plain-HTTP local runs.
    #[arg(long = "secure-cookies", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub secure_cookies: Option<bool>,
    /// Enable or disable the read cache.
    #[arg(long = "cache-enabled", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub cache_enabled: Option<bool>,
    /// Default time-to-live for cached reads; zero keeps entries until invalidated.
    #[arg(long = "cache-revalidate-seconds", value_name = "SECONDS")]
    pub cache_revalidate_seconds: Option<u64>,
}
