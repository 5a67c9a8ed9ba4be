use actix_web::{post, web, HttpResponse, Responder};

use crate::{
    auth::{accounts, TokenRequest, TokenResponse},
    error::AppError,
    state::AppState,
};

/// Exchange form-encoded credentials for a bearer token
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type: "bearer"}`.
/// - `401 Unauthorized`: Unknown username or wrong password (indistinguishable).
#[post("/token")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<TokenRequest>,
) -> Result<impl Responder, AppError> {
    let user = accounts::authenticate(
        state.users.as_ref(),
        &state.hasher,
        &form.username,
        &form.password,
    )
    .await?;

    let access_token = state
        .tokens
        .issue(&user.username)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
