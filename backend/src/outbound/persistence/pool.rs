//! Shared bb8 pool of async Diesel connections.
//!
//! [`DbPool::connect`] performs one checkout before returning, so a wrong URL
//! or unreachable server stops the binary at startup rather than on the first
//! request.

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Default wait for a free connection before a request is answered with 503.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which step of talking to the pool went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStage {
    /// Building the pool or its first connection.
    Connect,
    /// Borrowing a connection for a request.
    Checkout,
}

impl fmt::Display for PoolStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect to database",
            Self::Checkout => "check out connection",
        })
    }
}

/// Pool failure; repositories report it as a connection error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to {stage}: {message}")]
pub struct PoolError {
    stage: PoolStage,
    message: String,
}

impl PoolError {
    pub fn new(stage: PoolStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> PoolStage {
        self.stage
    }

    /// The driver's message without the stage prefix.
    pub fn into_message(self) -> String {
        self.message
    }
}

/// Connection settings for [`DbPool::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_size: u32,
    pub checkout_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections and [`DEFAULT_CHECKOUT_TIMEOUT`].
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }
}

/// Cloneable handle on the shared pool; each repository keeps one.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and verify the database answers.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolStage::Connect`] error when the pool cannot be built or
    /// the first connection cannot be opened within the checkout timeout.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::new(PoolStage::Connect, err.to_string()))?;

        let pool = Self { inner };
        pool.get()
            .await
            .map_err(|err| PoolError::new(PoolStage::Connect, err.into_message()))?;
        Ok(pool)
    }

    /// Borrow a connection.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolStage::Checkout`] error when none frees up in time.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::new(PoolStage::Checkout, err.to_string()))
    }
}
