//! Server address used for the base URL fallback of every group declaration.
//!
//! Values come from the project's `conf/app.conf` (`httpaddr` / `httpport` keys), and may be
//! overridden from the command line.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Location of the application config, relative to the project root
pub const APP_CONF: &str = "conf/app.conf";

pub const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host (optionally with scheme) the API is served from; empty means loopback
    pub http_addr: String,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: String::new(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl ServerConfig {
    /// Loads `conf/app.conf` under `project_root`, falling back to defaults when it is absent.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(APP_CONF);
        if !path.is_file() {
            debug!("No {} found, using default server address", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parses `key = value` lines. `#` and `;` start comments, `[section]` headers are
    /// ignored and keys are case-insensitive.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_lowercase().as_str() {
                "httpaddr" => config.http_addr = value.to_string(),
                "httpport" => {
                    config.http_port = value.parse().map_err(|_| {
                        Error::InvalidArgument(format!("httpport is not a port number: {}", value))
                    })?
                }
                _ => {}
            }
        }
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, http_addr: Option<String>, http_port: Option<u16>) -> Self {
        if let Some(addr) = http_addr {
            self.http_addr = addr;
        }
        if let Some(port) = http_port {
            self.http_port = port;
        }
        self
    }

    /// Absolute URL of the API rooted at `base` (for example `/v1`).
    pub fn base_url(&self, base: &str) -> String {
        if self.http_addr.is_empty() {
            format!("http://127.0.0.1:{}{}", self.http_port, base)
        } else {
            format!("{}:{}{}", self.http_addr, self.http_port, base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_app_conf() {
        let config = ServerConfig::parse(
            r#"
            appname = demo
            ; comment
            # another comment
            HttpAddr = "api.example.com"
            httpport = 9090
            runmode = dev
            "#,
        )
        .unwrap();
        assert_eq!(config.http_addr, "api.example.com");
        assert_eq!(config.http_port, 9090);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        assert!(ServerConfig::parse("httpport = eighty").is_err());
    }

    #[test]
    fn test_load_without_conf_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(ServerConfig::load(temp_dir.path()).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_load_reads_conf_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("conf")).unwrap();
        std::fs::write(temp_dir.path().join(APP_CONF), "httpport = 8000\n").unwrap();
        assert_eq!(ServerConfig::load(temp_dir.path()).unwrap().http_port, 8000);
    }

    #[test]
    fn test_base_url() {
        let config = ServerConfig::default();
        assert_eq!(config.base_url("/v1"), "http://127.0.0.1:8080/v1");

        let config = config.with_overrides(Some("http://api.example.com".into()), Some(80));
        assert_eq!(config.base_url("/v1"), "http://api.example.com:80/v1");
    }
}
