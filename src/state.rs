use std::sync::Arc;

use crate::auth::{IdentityResolver, PasswordHasher, TokenService};
use crate::store::{TaskStore, UserStore};

/// Shared application state, registered once as `web::Data<AppState>`.
///
/// Holds the storage handles plus the immutable signing and hashing settings.
/// There is no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Builds the state around a single store that implements both traits.
    pub fn new<S>(store: Arc<S>, tokens: TokenService, hasher: PasswordHasher) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        Self {
            users: store.clone(),
            tasks: store,
            tokens,
            hasher,
        }
    }

    pub fn resolver(&self) -> IdentityResolver<'_> {
        IdentityResolver::new(&self.tokens, self.users.as_ref())
    }
}
