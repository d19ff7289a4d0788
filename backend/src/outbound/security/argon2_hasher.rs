//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashes are stored as PHC strings, so each carries its own salt and cost
//! parameters. Work runs on the blocking pool with the caller's trace id.

use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::TraceId;
use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

const SALT_LEN: usize = 16;

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id password hasher with configurable cost.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Validate the cost parameters and build a hasher.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Configuration`] when Argon2 rejects the
    /// parameters, for example a memory cost below `8 * parallelism`.
    pub fn new(settings: HashingParams) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| PasswordHashError::configuration(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(argon2: &Argon2<'_>, plaintext: &str) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0_u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
}

fn verify_blocking(argon2: &Argon2<'_>, candidate: &str, encoded: &str) -> bool {
    match PhcString::new(encoded) {
        Ok(parsed) => argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            debug!(error = %err, "stored password hash is not a PHC string");
            false
        }
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHashError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || match trace_id {
        Some(id) => TraceId::sync_scope(id, work),
        None => work(),
    })
    .await
    .map_err(|err| PasswordHashError::hashing(format!("hashing task failed: {err}")))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let argon2 = self.argon2();
        let plaintext = Zeroizing::new(password.expose().to_owned());
        let encoded = run_blocking(move || hash_blocking(&argon2, &plaintext)).await??;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let argon2 = self.argon2();
        let candidate = Zeroizing::new(candidate.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || verify_blocking(&argon2, &candidate, &encoded)).await
    }
}
