use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use uuid::Uuid;

/// Command-line arguments for the erp-settings binary.
#[derive(Debug, Parser)]
#[command(
    name = "erp-settings",
    version,
    about = "Settings panel AJAX service"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "ERP_SETTINGS_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the settings panel HTTP service.
    Serve(Box<ServeArgs>),
    /// Print a settings nonce for a user, signed with the configured secret.
    Nonce(NonceArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct NonceArgs {
    /// User the nonce is issued for.
    #[arg(long = "user", value_name = "UUID")]
    pub user: Uuid,

    /// Action the nonce is bound to.
    #[arg(long = "action", value_name = "ACTION", default_value = "erp-settings-nonce")]
    pub action: String,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the fallback administrator address.
    #[arg(long = "site-admin-email", value_name = "EMAIL")]
    pub site_admin_email: Option<String>,

    /// Override the SMTP test timeout.
    #[arg(long = "smtp-timeout-seconds", value_name = "SECONDS")]
    pub smtp_timeout_seconds: Option<u64>,
}
