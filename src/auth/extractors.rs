use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::identity::AuthenticatedUser;
use crate::error::AppError;

/// Hands the identity resolved by `AuthMiddleware` to a handler.
///
/// Handlers behind the middleware take this as an argument and pass the inner
/// [`AuthenticatedUser`] to the task store. If the middleware did not run, the
/// extractor fails with `AppError::Unauthorized` instead of proceeding anonymously.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                let err = AppError::Unauthorized("Not authenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
