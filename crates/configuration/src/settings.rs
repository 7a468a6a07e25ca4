use core_types::SymbolUniverse;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// It is loaded once at startup and then shared read-only (behind an `Arc`)
/// by the statistics engine and the symbol validator.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The symbol universe, in the order rankings fall back to on ties.
    pub symbols: SymbolUniverse,
    pub storage: Storage,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub logging: Logging,
}

/// Which technology backs the per-symbol observation tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One `<SYMBOL>_values.csv` file per symbol.
    #[default]
    Csv,
    /// A `price_observations` table in PostgreSQL (`DATABASE_URL`).
    Postgres,
}

/// Where the observation data lives.
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding the CSV files. Required for the CSV backend.
    pub path: Option<PathBuf>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: IpAddr,
    pub port: u16,
}

impl Server {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When present, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
