pub mod http;

pub use crate::config::bind::http::HttpBindConfig;
use serde::{Deserialize, Serialize};

/// Network binding configuration
///
/// Where the HTTP API listens.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BindConfig {
    /// HTTP API binding
    #[serde(default)]
    pub http: HttpBindConfig,
}
