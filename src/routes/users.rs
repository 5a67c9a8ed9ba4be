use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::{accounts, RegisterRequest},
    error::AppError,
    models::UserResponse,
    state::AppState,
};

/// Register a new user
///
/// ## Responses:
/// - `200 OK`: `{id, username}` of the new account.
/// - `400 Bad Request`: The username is already registered, or the body is malformed.
/// - `422 Unprocessable Entity`: Username or password fails validation.
#[post("/users")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = accounts::register(
        state.users.as_ref(),
        &state.hasher,
        &register_data.username,
        &register_data.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
