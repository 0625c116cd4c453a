use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;

lazy_static! {
    /// Stands in for a stored hash when the login email is unknown, so both
    /// failure paths pay for one Argon2 verification.
    static ref DECOY_HASH: Option<String> = hash_password("decoy password, never issued").ok();
}

/// Salted Argon2id PHC string for `plain`.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// `Ok(false)` on a mismatch. A stored hash that does not parse, or any
/// other Argon2 failure, is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("malformed password hash: {e}"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}

/// Runs a verification against the decoy hash and discards the result.
pub fn verify_decoy(plain: &str) {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_password(plain, decoy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Secur3P@ssw0rd!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secur3P@ssw0rd!", &hash).unwrap());
        assert!(!verify_password("secur3p@ssw0rd!", &hash).unwrap());
    }

    #[test]
    fn every_hash_gets_its_own_salt() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn unparsable_stored_hash_is_an_error() {
        let err = verify_password("anything", "plaintext-in-the-db").unwrap_err();
        assert!(err.to_string().contains("malformed password hash"));
    }

    #[test]
    fn decoy_uses_the_same_argon2_parameters_as_real_hashes() {
        let decoy = DECOY_HASH.as_deref().expect("decoy hash built");
        let decoy = PasswordHash::new(decoy).unwrap();
        let real = hash_password("pw").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(decoy.algorithm, real.algorithm);
        assert_eq!(decoy.version, real.version);
        assert_eq!(decoy.params, real.params);
    }

    #[test]
    fn decoy_never_matches_a_login_attempt() {
        let decoy = DECOY_HASH.as_deref().unwrap();
        assert!(!verify_password("", decoy).unwrap());
        assert!(!verify_password("hunter2", decoy).unwrap());
        verify_decoy("hunter2");
    }
}
