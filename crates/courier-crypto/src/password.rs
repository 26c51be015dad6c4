use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Bytes of digest fed to Argon2 as the salt.
const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid hash parameters: {0}")]
    Params(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id cost settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashParams {
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self::new(
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
        )
    }
}

/// Salted one-way password hashing.
///
/// Hashes are PHC strings (`$argon2id$v=19$m=...$<salt>$<hash>`), so the salt
/// and cost travel with the stored value and verification needs nothing else.
#[derive(Clone)]
pub struct CredentialService {
    argon2: Argon2<'static>,
}

impl CredentialService {
    pub fn new(params: HashParams) -> Result<Self, CredentialError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| CredentialError::Params(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hash_with(plaintext, &salt)
    }

    /// Hash with a caller-chosen salt. Any byte string is accepted as salt,
    /// including an empty one; the same inputs always give the same output.
    pub fn hash_with_salt(&self, plaintext: &str, salt: &[u8]) -> Result<String, CredentialError> {
        let salt = normalize_salt(salt)?;
        self.hash_with(plaintext, &salt)
    }

    /// Check a password against a stored PHC hash. A hash that does not parse
    /// never verifies.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Like [`verify`](Self::verify), but also requires the hash to have been
    /// produced with `salt`.
    pub fn verify_with_salt(&self, plaintext: &str, salt: &[u8], hashed: &str) -> bool {
        let (Ok(expected), Ok(parsed)) = (normalize_salt(salt), PasswordHash::new(hashed)) else {
            return false;
        };
        if parsed.salt.map(|s| s.as_str()) != Some(expected.as_str()) {
            return false;
        }
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    fn hash_with(&self, plaintext: &str, salt: &SaltString) -> Result<String, CredentialError> {
        self.argon2
            .hash_password(plaintext.as_bytes(), salt)
            .map(|h| h.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }
}

impl Default for CredentialService {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

/// Argon2 wants 4..=64 base64 chars of salt; digest arbitrary input down to a
/// fixed-size salt so empty or oversized salts still hash.
fn normalize_salt(salt: &[u8]) -> Result<SaltString, CredentialError> {
    let digest = Sha256::digest(salt);
    SaltString::encode_b64(&digest[..SALT_LEN]).map_err(|e| CredentialError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CredentialService {
        CredentialService::new(HashParams::new(8, 1, 1)).unwrap()
    }

    #[test]
    fn hash_verify_roundtrip() {
        let svc = service();
        let hashed = svc.hash("password1").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(!hashed.contains("password1"));
        assert!(svc.verify("password1", &hashed));
        assert!(!svc.verify("password2", &hashed));
    }

    #[test]
    fn random_salts_differ() {
        let svc = service();
        let a = svc.hash("same-password").unwrap();
        let b = svc.hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(svc.verify("same-password", &a));
        assert!(svc.verify("same-password", &b));
    }

    #[test]
    fn fixed_salt_is_deterministic() {
        let svc = service();
        let a = svc.hash_with_salt("password1", b"pepper").unwrap();
        let b = svc.hash_with_salt("password1", b"pepper").unwrap();
        assert_eq!(a, b);
        assert!(svc.verify_with_salt("password1", b"pepper", &a));
        assert!(!svc.verify_with_salt("password1", b"other", &a));
        assert!(!svc.verify_with_salt("wrong", b"pepper", &a));
    }

    #[test]
    fn empty_inputs_still_hash() {
        let svc = service();
        let a = svc.hash_with_salt("", b"").unwrap();
        let b = svc.hash_with_salt("", b"").unwrap();
        assert_eq!(a, b);
        assert!(svc.verify("", &a));

        let weird = [0xffu8; 200];
        let c = svc.hash_with_salt("x", &weird).unwrap();
        assert!(svc.verify_with_salt("x", &weird, &c));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let svc = service();
        assert!(!svc.verify("password1", ""));
        assert!(!svc.verify("password1", "not-a-phc-string"));
        assert!(!svc.verify_with_salt("password1", b"s", "$argon2id$broken"));
    }

    #[test]
    fn verify_uses_params_from_hash() {
        let cheap = service();
        let hashed = cheap.hash("password1").unwrap();
        let other = CredentialService::new(HashParams::new(16, 2, 1)).unwrap();
        assert!(other.verify("password1", &hashed));
    }

    #[test]
    fn default_service_reads_cheap_hashes() {
        let hashed = service().hash("password1").unwrap();
        let svc = CredentialService::default();
        assert!(svc.verify("password1", &hashed));
        assert!(!svc.verify("password2", &hashed));
    }

    #[test]
    fn rejects_bad_params() {
        assert!(matches!(
            CredentialService::new(HashParams::new(8, 0, 1)),
            Err(CredentialError::Params(_))
        ));
    }
}
