//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback so the service can be configured
//! from a container spec without a wrapper script. Flags win over env.

use std::net::SocketAddr;

use clap::{ArgAction, Parser, ValueEnum};

/// Runtime configuration for the `rollcall` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "rollcall", version, about = "In-memory user records over HTTP")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "ROLLCALL_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Log output format.
    #[arg(long, env = "ROLLCALL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Register `GET /test/error`, which always answers 500.
    #[arg(long, env = "ROLLCALL_DIAGNOSTIC_ROUTES", default_value_t = true, action = ArgAction::Set)]
    pub diagnostic_routes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["rollcall"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.diagnostic_routes);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "rollcall",
            "--addr", "127.0.0.1:8080",
            "--log-format", "json",
            "--diagnostic-routes", "false",
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.diagnostic_routes);
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Config::try_parse_from(["rollcall", "--addr", "not-an-addr"]).is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
