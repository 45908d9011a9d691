//! Configuration for the echo server.
//!
//! Supports command-line arguments, the hosting platform's port variable and
//! an optional TOML file. CLI arguments take precedence over file values.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

/// Port variable set by the platform when running as a custom handler.
pub const PORT_ENV: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

#[derive(Parser, Debug)]
#[command(name = "echo-server")]
#[command(version)]
#[command(about = "HTTP echo function for connectivity probes", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 0.0.0.0:8080)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Port to bind on 127.0.0.1, used when no listen address is given
    #[arg(short = 'p', long, env = PORT_ENV)]
    pub port: Option<u16>,

    /// Path segment placed before `/echo` (e.g., `api`)
    #[arg(long)]
    pub route_prefix: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route_prefix: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: SocketAddr,
    pub route_prefix: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ([127, 0, 0, 1], 3000).into(),
            route_prefix: String::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the process arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = match cli.config {
            Some(ref path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::FileRead(path.clone(), e))?;
                toml::from_str(&contents).map_err(|e| ConfigError::TomlParse(path.clone(), e))?
            }
            None => TomlConfig::default(),
        };

        Self::merge(cli, toml_config)
    }

    /// Merge CLI args over file values. An explicit listen address wins over
    /// a bare port; a bare port wins over the file.
    fn merge(cli: CliArgs, file: TomlConfig) -> Result<Self, ConfigError> {
        let listen = match (cli.listen, cli.port) {
            (Some(listen), _) => listen,
            (None, Some(port)) => format!("127.0.0.1:{port}"),
            (None, None) => file.server.listen,
        };
        let listen: SocketAddr = listen
            .parse()
            .map_err(|_| ConfigError::InvalidListen(listen.clone()))?;

        Ok(Config {
            listen,
            route_prefix: cli.route_prefix.unwrap_or(file.server.route_prefix),
            log_level: cli.log_level.unwrap_or(file.logging.level),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {}", .0.display(), .1)]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file '{}': {}", .0.display(), .1)]
    TomlParse(PathBuf, #[source] toml::de::Error),

    #[error("invalid listen address '{0}'")]
    InvalidListen(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CliArgs {
        let argv = std::iter::once("echo-server").chain(args.iter().copied());
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn bare_cli() -> CliArgs {
        CliArgs {
            config: None,
            listen: None,
            port: None,
            route_prefix: None,
            log_level: None,
        }
    }

    #[test]
    fn test_default_toml_config() {
        let config = TomlConfig::default();
        assert_eq!(config.server.listen, "127.0.0.1:3000");
        assert_eq!(config.server.route_prefix, "");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_defaults_resolve_to_default_config() {
        let config = Config::merge(bare_cli(), TomlConfig::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [server]
            listen = "0.0.0.0:7071"
            route_prefix = "api"

            [logging]
            level = "debug"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:7071");
        assert_eq!(config.server.route_prefix, "api");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:3000");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: TomlConfig = toml::from_str(
            "[server]\nlisten = \"0.0.0.0:9000\"\nroute_prefix = \"api\"\n",
        )
        .unwrap();
        let args = cli(&["--listen", "127.0.0.1:8080", "--route-prefix", "", "--log-level", "trace"]);

        let config = Config::merge(args, file).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.route_prefix, "");
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_port_binds_loopback() {
        let args = CliArgs {
            port: Some(7071),
            ..bare_cli()
        };
        let config = Config::merge(args, TomlConfig::default()).unwrap();
        assert_eq!(config.listen, "127.0.0.1:7071".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_listen_wins_over_port() {
        let args = CliArgs {
            listen: Some("0.0.0.0:8080".to_string()),
            port: Some(7071),
            ..bare_cli()
        };
        let config = Config::merge(args, TomlConfig::default()).unwrap();
        assert_eq!(config.listen.port(), 8080);
    }

    #[test]
    fn test_invalid_listen_is_rejected() {
        let args = CliArgs {
            listen: Some("not an address".to_string()),
            ..bare_cli()
        };
        let err = Config::merge(args, TomlConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListen(ref s) if s == "not an address"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = CliArgs {
            config: Some(PathBuf::from("/nonexistent/echo-server.toml")),
            ..bare_cli()
        };
        let err = Config::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }
}
