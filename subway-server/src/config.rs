//! Server configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::navigator::Traversal;

const ADDR_VAR: &str = "SUBWAY_ADDR";
const SEED_VAR: &str = "SUBWAY_SEED";
const TRAVERSAL_VAR: &str = "SUBWAY_TRAVERSAL";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value:?}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be \"directed\" or \"bidirectional\", got {value:?}")]
    InvalidTraversal { var: &'static str, value: String },
}

/// Start-up settings for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,

    /// JSON network to load before serving
    pub seed_path: Option<PathBuf>,

    /// Whether routes may ride segments against their direction
    pub traversal: Traversal,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_path: None,
            traversal: Traversal::Directed,
        }
    }
}

impl ServerConfig {
    /// Reads `SUBWAY_ADDR`, `SUBWAY_SEED` and `SUBWAY_TRAVERSAL`. Unset or
    /// empty variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ADDR_VAR) {
            config.addr = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddr {
                    var: ADDR_VAR,
                    value,
                })?;
        }

        config.seed_path = get(SEED_VAR).map(PathBuf::from);

        if let Some(value) = get(TRAVERSAL_VAR) {
            config.traversal =
                Traversal::parse(&value).ok_or(ConfigError::InvalidTraversal {
                    var: TRAVERSAL_VAR,
                    value,
                })?;
        }

        Ok(config)
    }
}
