use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salted, deliberately slow password hashing backed by bcrypt.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh salt, so hashing the same
/// plaintext twice yields different strings. A throwaway hash is computed at
/// construction so that a login for an unknown username can pay the same
/// verification cost as a wrong password.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash("timing-equalizer", cost)
            .map_err(|e| AppError::InternalServerError(format!("Invalid bcrypt cost {}: {}", cost, e)))?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        verify(password, hashed_password)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }

    /// Burns one verification against the throwaway hash. Always `false`.
    ///
    /// Only the elapsed time matters here, so an error from `verify` changes nothing.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = verify(password, &self.dummy_hash);
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = hasher();
        let password = "test_password123";
        let hashed = hasher.hash(password).unwrap();

        assert_ne!(hashed, password);
        assert!(hasher.verify(password, &hashed).unwrap());
        assert!(!hasher.verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = hasher();
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same", &first).unwrap());
        assert!(hasher.verify("same", &second).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match hasher().verify("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        assert!(PasswordHasher::new(1).is_err());
    }

    #[test]
    fn test_verify_dummy_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy("timing-equalizer"));
        assert!(!hasher.verify_dummy("anything"));
    }
}
