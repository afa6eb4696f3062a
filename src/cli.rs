use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::error::{ServiceError, ServiceResult};
use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::server::{DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES, ServerConfig};
use crate::tools::{DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};

/// Paths the router always mounts; the OpenAPI route may not shadow them.
const RESERVED_PATHS: [&str; 4] = ["/", "/health", "/echo", "/format-number"];

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server
    Start(CommandArguments),
    /// Show the resolved server configuration
    Status(CommandArguments),
    /// Format a number the way POST /format-number does
    Format(FormatArguments),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct CommandArguments {
    /// HTTP bind address
    #[arg(long, env = "APP_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// Path to serve the OpenAPI document on; disabled when unset
    #[arg(long, env = "OPENAPI_URL")]
    pub openapi_url: Option<String>,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "APP_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

#[derive(Args, Debug, Clone)]
pub struct FormatArguments {
    /// Number to format (also accepts NaN / inf, which are rejected)
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Fixed decimals for non-integers below one thousand
    #[arg(long, default_value_t = DEFAULT_DECIMAL_PLACES)]
    pub decimal_places: u8,
}

impl CommandArguments {
    pub fn default_settings() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            openapi_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Validate CLI/environment-derived arguments.
    pub fn validate(&self) -> Result<(), String> {
        self.http_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid APP_HTTP_ADDR '{}': {e}", self.http_addr))?;

        if self.max_body_bytes == 0 {
            return Err("APP_MAX_BODY_BYTES must be greater than zero".to_string());
        }

        if let Some(url) = &self.openapi_url {
            if !url.starts_with('/') || url.len() < 2 {
                return Err(format!("OPENAPI_URL '{url}' must be a path like /openapi.json"));
            }
            if url.contains(['{', '}', ':', '*']) {
                return Err(format!("OPENAPI_URL '{url}' may not contain route parameters"));
            }
            if RESERVED_PATHS.contains(&url.as_str()) {
                return Err(format!("OPENAPI_URL '{url}' collides with an API route"));
            }
        }
        Ok(())
    }

    /// Validate and convert into the server's configuration.
    pub fn into_config(self) -> ServiceResult<ServerConfig> {
        self.validate().map_err(ServiceError::Config)?;
        Ok(ServerConfig {
            http_addr: self.http_addr.parse()?,
            openapi_url: self.openapi_url,
            max_body_bytes: self.max_body_bytes,
        })
    }
}

impl FormatArguments {
    pub fn validate(&self) -> Result<(), String> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(format!("--decimal-places must be at most {MAX_DECIMAL_PLACES}"));
        }
        Ok(())
    }
}
