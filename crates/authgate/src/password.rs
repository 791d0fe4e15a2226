// ============================
// crates/authgate/src/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

/// scrypt block size parameter.
const SCRYPT_R: u32 = 8;
/// scrypt parallelism parameter.
const SCRYPT_P: u32 = 1;
/// Output length in bytes.
const SCRYPT_LEN: usize = 32;

/// Hash a secret using scrypt with a random salt.
///
/// `log_n` is the work factor (log2 of the cost parameter N). Returns the
/// PHC-formatted hash string, which embeds the parameters and the salt.
pub fn hash_secret(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let params = scrypt::Params::new(log_n, SCRYPT_R, SCRYPT_P, SCRYPT_LEN)?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a secret against a stored PHC hash.
///
/// A malformed hash verifies as `false`; this never errors.
pub fn verify_secret(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash a secret and zeroize the plaintext buffer.
pub fn hash_secret_secure(plain: &mut String, log_n: u8) -> anyhow::Result<String> {
    let hash = hash_secret(plain, log_n);
    plain.zeroize();
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low work factor keeps the suite fast; production uses the configured value.
    const TEST_LOG_N: u8 = 10;

    #[test]
    fn test_hash_and_verify() {
        let secret = "correct-horse-battery-staple";
        let hash = hash_secret(secret, TEST_LOG_N).unwrap();

        assert_ne!(hash, secret);
        assert!(hash.starts_with("$scrypt$"));
        assert!(verify_secret(&hash, secret));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let hash = hash_secret("real-secret", TEST_LOG_N).unwrap();
        assert!(!verify_secret(&hash, "wrong-secret"));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_secret("not-a-phc-string", "whatever"));
        assert!(!verify_secret("", "whatever"));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let a = hash_secret("same-secret", TEST_LOG_N).unwrap();
        let b = hash_secret("same-secret", TEST_LOG_N).unwrap();
        assert_ne!(a, b);
        assert!(verify_secret(&a, "same-secret"));
        assert!(verify_secret(&b, "same-secret"));
    }

    #[test]
    fn test_secure_variant_zeroizes_plaintext() {
        let mut plain = "sensitive".to_string();
        let hash = hash_secret_secure(&mut plain, TEST_LOG_N).unwrap();
        assert!(plain.is_empty());
        assert!(verify_secret(&hash, "sensitive"));
    }
}
