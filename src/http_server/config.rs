//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP surface. Every field has a default so a
/// partial (or absent) config section still produces a working server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Notes per page for the list endpoint
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Directory served at the root path
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Allowed CORS origins. An empty list allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> usize {
    10
}

fn default_static_dir() -> String {
    "./frontend".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_size: default_page_size(),
            static_dir: default_static_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Same configuration bound to a different port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The bind address in `host:port` form.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.static_dir, "./frontend");
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::default().with_port(9090);
        assert_eq!(config.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 3000}"#).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.page_size, 10);
    }
}
