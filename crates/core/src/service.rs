//! Public dashboard service: the injected collaborators shared by the
//! resolver, config lifecycle and metric request operations.
//!
//! The service holds no per-request state and is shared behind `Arc`.

use std::sync::Arc;

use crate::access_token::{AccessTokenGenerator, OsRngTokenGenerator};
use crate::store::PublicDashboardStore;

#[derive(Clone)]
pub struct PublicDashboardService {
    pub(crate) store: Arc<dyn PublicDashboardStore>,
    pub(crate) tokens: Arc<dyn AccessTokenGenerator>,
}

impl PublicDashboardService {
    /// Service backed by `store`, generating tokens from the OS CSPRNG.
    pub fn new(store: Arc<dyn PublicDashboardStore>) -> Self {
        Self::with_token_generator(store, Arc::new(OsRngTokenGenerator))
    }

    pub fn with_token_generator(
        store: Arc<dyn PublicDashboardStore>,
        tokens: Arc<dyn AccessTokenGenerator>,
    ) -> Self {
        Self { store, tokens }
    }

    pub fn store(&self) -> &Arc<dyn PublicDashboardStore> {
        &self.store
    }
}
