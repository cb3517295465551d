use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::Rng;

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {e}"))
}

/// `false` for a wrong password and for an unparseable stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Six-digit numeric one-time code, never starting with zero.
pub fn generate_verify_code() -> String {
    rand::rng().random_range(100_000..1_000_000u32).to_string()
}

/// Long random password for accounts that never sign in with one.
pub fn generate_unusable_password() -> String {
    let mut rng = rand::rng();
    (0..48)
        .map(|_| rng.sample(rand::distr::Alphanumeric) as char)
        .collect()
}
