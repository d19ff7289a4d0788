//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CodeSampleCommand, CodeSampleQuery, CredentialStore, FixtureCodeSampleCommand,
    FixtureCodeSampleQuery, FixtureCredentialStore,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialStore>,
    pub code_samples: Arc<dyn CodeSampleQuery>,
    pub code_sample_commands: Arc<dyn CodeSampleCommand>,
}

impl HttpState {
    /// Construct state from the three driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use codelibrary::domain::ports::{
    ///     FixtureCodeSampleCommand, FixtureCodeSampleQuery, FixtureCredentialStore,
    /// };
    /// use codelibrary::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureCredentialStore),
    ///     Arc::new(FixtureCodeSampleQuery),
    ///     Arc::new(FixtureCodeSampleCommand),
    /// );
    /// let _credentials = state.credentials.clone();
    /// ```
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        code_samples: Arc<dyn CodeSampleQuery>,
        code_sample_commands: Arc<dyn CodeSampleCommand>,
    ) -> Self {
        Self {
            credentials,
            code_samples,
            code_sample_commands,
        }
    }

    /// State backed by the in-memory fixtures, used without a database.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureCredentialStore),
            Arc::new(FixtureCodeSampleQuery),
            Arc::new(FixtureCodeSampleCommand),
        )
    }
}
