use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id hasher with a cost fixed at construction.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Salted hash of `plain` in PHC string form. Any input is accepted,
    /// including the empty string.
    pub fn hash(&self, plain: &str) -> Result<Vec<u8>, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                e
            })?
            .to_string();
        Ok(hash.into_bytes())
    }

    /// Malformed hashes verify as false. The cost is read from the PHC
    /// string, so hashes made under an older cost still verify.
    pub fn verify(&self, plain: &str, hash: &[u8]) -> bool {
        let Ok(encoded) = std::str::from_utf8(hash) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return false;
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::new(Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid params"))
}
