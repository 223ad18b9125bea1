use argon2::{
    Argon2, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{AuthError, Result};

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Hashes a secret using Argon2id.
///
/// # Arguments
///
/// * `secret` - The plaintext secret to hash.
///
/// # Returns
///
/// A `Result` containing the encoded hash string.
pub fn hash_secret(secret: &str) -> Result<String> {
    let mut secret_bytes = secret.as_bytes().to_vec();

    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AuthError::Hash(format!("Argon2 params: {}", e)))?,
    );

    let hash = argon2
        .hash_password(&secret_bytes, &salt)
        .map_err(|e| AuthError::Hash(format!("Argon2 hash error: {}", e)))?
        .to_string();

    secret_bytes.zeroize();
    tracing::debug!("Secret hashed with Argon2id");
    Ok(hash)
}

/// Verifies a secret against a stored hash.
///
/// Pure check, no state: the hash string embeds its own parameters.
///
/// # Arguments
///
/// * `secret` - The plaintext secret to verify.
/// * `hash` - The stored hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the secret matches, `false` otherwise.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool> {
    let mut secret_bytes = secret.as_bytes().to_vec();

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Hash(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&secret_bytes, &parsed_hash)
        .is_ok();

    secret_bytes.zeroize();
    Ok(result)
}

/// Constant-time equality for secret/confirmation pairs.
pub fn secrets_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
