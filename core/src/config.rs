//! Hosting configuration for the screening endpoint.
//!
//! Rule thresholds are compiled in and not configurable. Only where the
//! endpoint listens is.
//!
//! Precedence, later wins:
//!   1. built-in defaults
//!   2. JSON file given by `--config <path>` (every key optional)
//!   3. `--bind <addr>` and `--port <u16>` flags

use crate::error::{ScreenError, ScreenResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7071;
pub const DEFAULT_ROUTE: &str = "/api/TestTransaction";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            port: DEFAULT_PORT,
            route: DEFAULT_ROUTE.into(),
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ScreenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        log::debug!("Loaded server config from {}", path.display());
        Ok(config)
    }

    /// Resolve the full config from process arguments (`args[0]` is the program).
    pub fn from_args(args: &[String]) -> ScreenResult<Self> {
        let base = match flag_value(args, "--config") {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply `--bind` and `--port`. Unparseable values leave the field unchanged.
    pub fn with_overrides(mut self, args: &[String]) -> Self {
        if let Some(bind) = flag_value(args, "--bind") {
            self.bind_addr = bind.to_string();
        }
        self.port = parse_arg(args, "--port", self.port);
        self
    }

    pub fn validate(&self) -> ScreenResult<()> {
        if !self.route.starts_with('/') {
            return Err(ScreenError::InvalidConfig {
                reason: format!("route must start with '/': {:?}", self.route),
            });
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> ScreenResult<SocketAddr> {
        let ip: IpAddr = self.bind_addr.parse().map_err(|_| ScreenError::InvalidConfig {
            reason: format!("bind address is not an IP address: {:?}", self.bind_addr),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("txscreen-server")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_args(&args(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 7071);
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::from_args(&args(&["--bind", "127.0.0.1", "--port", "8080"])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn bad_port_keeps_previous_value() {
        let config = ServerConfig::default().with_overrides(&args(&["--port", "http"]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{ "port": 9000 }"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.route, DEFAULT_ROUTE);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn file_then_flags() {
        let path = std::env::temp_dir().join(format!("txscreen-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "bind_addr": "127.0.0.1", "port": 9000, "route": "/screen" }"#).unwrap();

        let config = ServerConfig::from_args(&args(&[
            "--config",
            path.to_str().unwrap(),
            "--port",
            "9100",
        ]))
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 9100);
        assert_eq!(config.route, "/screen");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ServerConfig::from_args(&args(&["--config", "/nonexistent/txscreen.json"]));
        assert!(matches!(err, Err(ScreenError::Io(_))));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("txscreen-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ port: ").unwrap();
        let err = ServerConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Err(ScreenError::Serialization(_))));
    }

    #[test]
    fn invalid_values_rejected() {
        let bad_route = ServerConfig { route: "api".into(), ..ServerConfig::default() };
        assert!(bad_route.validate().is_err());

        let bad_bind = ServerConfig { bind_addr: "localhost:80".into(), ..ServerConfig::default() };
        assert!(bad_bind.validate().is_err());
    }
}
