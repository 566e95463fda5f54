use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params,
};

/// Newtype for password to prevent accidental logging
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newtype for password hash
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Result of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Matches, hash is current.
    Success,
    /// Matches, but the hash was produced with stale parameters and should be
    /// replaced on the next write.
    RehashNeeded,
    /// Does not match.
    Failed,
}

impl VerifyOutcome {
    pub fn is_match(self) -> bool {
        matches!(self, VerifyOutcome::Success | VerifyOutcome::RehashNeeded)
    }
}

/// Hash a password using Argon2
///
/// Uses Argon2id variant with secure default parameters.
/// Salt is automatically generated and included in the hash.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Verify a password against a stored hash.
///
/// A mismatch is an outcome, not an error; `Err` is reserved for hashes the
/// library cannot parse at all.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<VerifyOutcome, anyhow::Error> {
    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    match Argon2::default().verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => {
            // Compare cost parameters only: params decoded from a hash carry
            // an explicit output length while the defaults leave it None.
            let defaults = Params::default();
            let current = parsed_hash.algorithm == Algorithm::Argon2id.ident()
                && Params::try_from(&parsed_hash)
                    .map(|stored| {
                        stored.m_cost() == defaults.m_cost()
                            && stored.t_cost() == defaults.t_cost()
                            && stored.p_cost() == defaults.p_cost()
                    })
                    .unwrap_or(false);
            if current {
                Ok(VerifyOutcome::Success)
            } else {
                Ok(VerifyOutcome::RehashNeeded)
            }
        }
        Err(argon2::password_hash::Error::Password) => Ok(VerifyOutcome::Failed),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::Version;

    #[test]
    fn test_hash_password() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        // Hash should not be empty
        assert!(!hash.as_str().is_empty());

        // Hash should start with $argon2
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert_eq!(
            verify_password(&password, &hash).unwrap(),
            VerifyOutcome::Success
        );
    }

    #[test]
    fn test_verify_password_incorrect() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        let wrong_password = Password::new("wrongPassword".to_string());

        assert_eq!(
            verify_password(&wrong_password, &hash).unwrap(),
            VerifyOutcome::Failed
        );
    }

    #[test]
    fn test_stale_parameters_request_rehash() {
        // Hash with deliberately weak parameters, as an old deployment might have.
        let stale_params = Params::new(8192, 1, 1, None).unwrap();
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, stale_params);
        let salt = SaltString::generate(&mut OsRng);
        let stale_hash = PasswordHashString::new(
            argon2
                .hash_password(b"mySecurePassword123", &salt)
                .unwrap()
                .to_string(),
        );

        let password = Password::new("mySecurePassword123".to_string());
        assert_eq!(
            verify_password(&password, &stale_hash).unwrap(),
            VerifyOutcome::RehashNeeded
        );
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash1 = hash_password(&password).expect("Failed to hash password");
        let hash2 = hash_password(&password).expect("Failed to hash password");

        // Same password should produce different hashes (due to random salt)
        assert_ne!(hash1.as_str(), hash2.as_str());

        // Both should verify correctly
        assert!(verify_password(&password, &hash1).unwrap().is_match());
        assert!(verify_password(&password, &hash2).unwrap().is_match());
    }
}
