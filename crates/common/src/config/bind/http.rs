use serde::{Deserialize, Serialize};

/// HTTP API binding configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpBindConfig {
    /// Bind IP address
    ///
    /// Network interface the API listens on. Use "0.0.0.0" for all
    /// interfaces.
    #[serde(default = "default_ip")]
    pub ip: String,

    /// Bind port
    ///
    /// Defaults to 18999, inside the 18xxx range of the monitored services.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    18999
}

impl Default for HttpBindConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
        }
    }
}

impl HttpBindConfig {
    /// `ip:port` string suitable for `SocketAddr` parsing
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
