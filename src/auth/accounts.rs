use actix_web::web;

use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Creates an account for `username`, storing only the bcrypt hash of `password`.
///
/// Fails with `AppError::Conflict` if the exact username already exists.
pub async fn register(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    if users.find_user_by_username(username).await?.is_some() {
        log::info!("Registration rejected: username {:?} is taken", username);
        return Err(crate::store::username_taken());
    }

    let hasher = hasher.clone();
    let password = password.to_string();
    let password_hash = web::block(move || hasher.hash(&password)).await??;

    let user = users.insert_user(username, &password_hash).await?;
    log::info!("Registered user {} ({:?})", user.id, user.username);
    Ok(user)
}

/// Checks `username`/`password` against the credential store.
///
/// Unknown usernames and wrong passwords produce the same error, and both pay for
/// one bcrypt verification.
pub async fn authenticate(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = users.find_user_by_username(username).await?;

    let hasher = hasher.clone();
    let password = password.to_string();
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = web::block(move || match stored_hash {
        Some(hash) => hasher.verify(&password, &hash),
        None => Ok(hasher.verify_dummy(&password)),
    })
    .await??;

    match user {
        Some(user) if matches => Ok(user),
        _ => {
            log::info!("Failed login attempt for {:?}", username);
            Err(invalid_credentials())
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Incorrect username or password".into())
}
