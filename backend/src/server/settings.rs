//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CODELIBRARY_*` environment variables, and an
//! optional configuration file, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use codelibrary::outbound::persistence::{DEFAULT_CHECKOUT_TIMEOUT, PoolConfig};
use codelibrary::outbound::security::HashingParams;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 7000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Configuration values controlling the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CODELIBRARY")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL; without it the server runs on fixture ports.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds a request waits for a pooled connection before failing.
    pub db_checkout_timeout_secs: Option<u64>,
    /// Run each search's count and page inside one read-only snapshot.
    #[ortho_config(default = false)]
    pub search_snapshot: bool,
    /// Argon2 memory cost in KiB.
    pub argon2_memory_kib: Option<u32>,
    /// Argon2 pass count.
    pub argon2_iterations: Option<u32>,
    /// Argon2 lane count.
    pub argon2_parallelism: Option<u32>,
}

impl AppSettings {
    /// Socket address built from `host` and `port`, with defaults applied.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, falling back to the default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Pool settings for `database_url`.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.db_max_connections())
            .with_checkout_timeout(
                self.db_checkout_timeout_secs
                    .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_secs),
            )
    }

    /// Argon2 cost parameters; unset values keep the crate defaults.
    pub fn hashing_params(&self) -> HashingParams {
        let defaults = HashingParams::default();
        HashingParams {
            memory_kib: self.argon2_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.argon2_iterations.unwrap_or(defaults.iterations),
            parallelism: self.argon2_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}
