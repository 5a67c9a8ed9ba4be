use crate::auth::token::{TokenError, TokenService};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// An identity proven by a valid bearer token.
///
/// There is no public constructor: values come from [`IdentityResolver::resolve`],
/// and every task store operation requires one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: i64,
    username: String,
}

impl AuthenticatedUser {
    pub(crate) fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Turns a bearer token into the user it was issued to.
pub struct IdentityResolver<'a> {
    tokens: &'a TokenService,
    users: &'a dyn UserStore,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(tokens: &'a TokenService, users: &'a dyn UserStore) -> Self {
        Self { tokens, users }
    }

    /// Verifies `token` and looks up its subject.
    ///
    /// Bad signatures, malformed or expired tokens and unknown subjects all fail
    /// with the same `Unauthorized` error.
    pub async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.tokens.verify(token).map_err(|e| {
            match e {
                TokenError::Expired => log::info!("Rejected expired token"),
                other => log::warn!("Rejected token: {}", other),
            }
            unauthorized()
        })?;

        match self.users.find_user_by_username(&claims.sub).await? {
            Some(user) => Ok(AuthenticatedUser::from_user(&user)),
            None => {
                log::warn!("Token subject no longer resolves to a user");
                Err(unauthorized())
            }
        }
    }
}

pub(crate) fn unauthorized() -> AppError {
    AppError::Unauthorized("Could not validate credentials".into())
}
