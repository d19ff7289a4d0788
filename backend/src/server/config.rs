//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use codelibrary::outbound::persistence::{DbPool, SearchConsistency};
use codelibrary::outbound::security::HashingParams;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) search_consistency: SearchConsistency,
    pub(crate) hashing: HashingParams,
}

impl ServerConfig {
    /// Construct a server configuration from the session settings and bind
    /// address.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            search_consistency: SearchConsistency::default(),
            hashing: HashingParams::default(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one, every port is served by its in-memory fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select how searches pair their count and page statements.
    #[must_use]
    pub fn with_search_consistency(mut self, consistency: SearchConsistency) -> Self {
        self.search_consistency = consistency;
        self
    }

    /// Argon2 cost used for new password hashes.
    #[must_use]
    pub fn with_hashing_params(mut self, hashing: HashingParams) -> Self {
        self.hashing = hashing;
        self
    }
}
