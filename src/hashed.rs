//! Hash production and password verification.

use std::fmt;
use std::str::FromStr;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::crypto::{EntropySource, OsEntropy, ParameterSet, Salt, derive_key};
use crate::error::{ArgonizeError, Result};
use crate::format;

/// The outcome of hashing a password: parameters, salt and derived key.
///
/// The password itself is never retained. The key is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct HashResult {
    params: ParameterSet,
    salt: Salt,
    key: Vec<u8>,
}

impl Drop for HashResult {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for HashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashResult")
            .field("params", &self.params)
            .field("salt", &self.salt)
            .field("key", &format_args!("{} bytes", self.key.len()))
            .finish()
    }
}

impl HashResult {
    /// Assembles a result from already-known parts. No consistency checks are made.
    pub fn from_parts(params: ParameterSet, salt: Salt, key: Vec<u8>) -> Self {
        Self { params, salt, key }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns `true` if `candidate` derives the same key under this result's
    /// salt and parameters.
    ///
    /// The keys are compared in constant time. A derivation failure counts as
    /// a mismatch.
    pub fn is_valid(&self, candidate: &[u8]) -> bool {
        let mut other = match derive_key(candidate, self.salt.as_bytes(), &self.params) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "password verification could not derive a key");
                return false;
            }
        };

        let matched: bool = self.key.as_slice().ct_eq(other.as_slice()).into();
        other.zeroize();
        matched
    }

    /// Canonical `$argon2id$v=19$m=..,t=..,p=..$salt$key` representation.
    pub fn encode(&self) -> String {
        format::phc::encode(self)
    }

    /// Parses a canonical encoded hash, as produced by [`HashResult::encode`].
    pub fn decode(encoded: &str) -> Result<Self> {
        format::phc::decode(encoded)
    }

    /// Opaque byte form for storage in binary columns.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        format::serialize(self)
    }

    /// Reverses [`HashResult::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        format::parse(data)
    }
}

impl fmt::Display for HashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for HashResult {
    type Err = ArgonizeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

/// Produces [`HashResult`]s, drawing salts from an injected entropy source.
#[derive(Debug, Clone, Default)]
pub struct Hasher<E = OsEntropy> {
    entropy: E,
}

impl Hasher<OsEntropy> {
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> Hasher<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// Hash `password` with default parameters and a fresh random salt.
    pub fn hash(&self, password: &[u8]) -> Result<HashResult> {
        self.hash_custom(password, None, None)
    }

    /// Hash `password` with optional parameters and salt.
    ///
    /// Missing parameters fall back to [`ParameterSet::default`]. A missing or
    /// empty salt is generated with `params.salt_length()` random bytes. Salt
    /// generation is attempted before the password check, so an entropy
    /// failure is reported even when the password is also empty.
    ///
    /// The returned parameters record the salt and key lengths actually used.
    pub fn hash_custom(
        &self,
        password: &[u8],
        params: Option<&ParameterSet>,
        salt: Option<Salt>,
    ) -> Result<HashResult> {
        let params = params.copied().unwrap_or_default();

        let salt = match salt {
            Some(salt) if !salt.is_empty() => salt,
            _ => Salt::generate(params.salt_length(), &self.entropy)?,
        };

        if password.is_empty() {
            return Err(ArgonizeError::EmptyPassword);
        }

        let salt_length =
            u32::try_from(salt.len()).map_err(|_| ArgonizeError::LengthOutOfRange {
                salt: salt.len(),
                key: params.key_length() as usize,
            })?;
        let key = derive_key(password, salt.as_bytes(), &params)?;
        let params = params.with_salt_length(salt_length);

        debug!(
            m = params.memory_cost_kib(),
            t = params.iterations(),
            p = params.parallelism(),
            salt_len = salt_length,
            key_len = params.key_length(),
            "password hashed"
        );

        Ok(HashResult { params, salt, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::entropy::testing::{BrokenEntropy, FixedEntropy};

    const CHEAP: ParameterSet = ParameterSet::new(1, 64, 1, 16, 32);

    fn hash_cheap(password: &[u8]) -> HashResult {
        Hasher::new()
            .hash_custom(password, Some(&CHEAP), None)
            .unwrap()
    }

    #[test]
    fn valid_password_verifies() {
        let h = hash_cheap(b"my password");

        assert!(h.is_valid(b"my password"));
        assert!(!h.is_valid(b"wrong password"));
        assert!(!h.is_valid(b""));
    }

    #[test]
    fn result_carries_params_salt_and_key() {
        let h = hash_cheap(b"pw");

        assert_eq!(h.params(), &CHEAP);
        assert_eq!(h.salt().len(), 16);
        assert_eq!(h.key().len(), 32);
    }

    #[test]
    fn explicit_salt_is_deterministic() {
        let hasher = Hasher::new();
        let salt = Salt::from(vec![5u8; 16]);

        let a = hasher
            .hash_custom(b"pw", Some(&CHEAP), Some(salt.clone()))
            .unwrap();
        let b = hasher.hash_custom(b"pw", Some(&CHEAP), Some(salt)).unwrap();

        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn generated_salts_differ() {
        let a = hash_cheap(b"pw");
        let b = hash_cheap(b"pw");

        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn empty_salt_is_replaced() {
        let hasher = Hasher::with_entropy(FixedEntropy(1));
        let h = hasher
            .hash_custom(b"pw", Some(&CHEAP), Some(Salt::default()))
            .unwrap();

        assert_eq!(h.salt().as_bytes(), &[1u8; 16]);
    }

    #[test]
    fn injected_entropy_makes_hash_reproducible() {
        let hasher = Hasher::with_entropy(FixedEntropy(9));

        let a = hasher.hash_custom(b"pw", Some(&CHEAP), None).unwrap();
        let b = hasher.hash_custom(b"pw", Some(&CHEAP), None).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn empty_password_fails() {
        assert!(matches!(
            Hasher::new().hash_custom(b"", Some(&CHEAP), None),
            Err(ArgonizeError::EmptyPassword)
        ));
    }

    #[test]
    fn entropy_failure_fails() {
        let hasher = Hasher::with_entropy(BrokenEntropy);

        assert!(matches!(
            hasher.hash_custom(b"pw", Some(&CHEAP), None),
            Err(ArgonizeError::RandomGenerationFailed(_))
        ));
    }

    #[test]
    fn entropy_failure_wins_over_empty_password() {
        let hasher = Hasher::with_entropy(BrokenEntropy);

        assert!(matches!(
            hasher.hash_custom(b"", Some(&CHEAP), None),
            Err(ArgonizeError::RandomGenerationFailed(_))
        ));
    }

    #[test]
    fn explicit_salt_skips_entropy() {
        let hasher = Hasher::with_entropy(BrokenEntropy);
        let h = hasher
            .hash_custom(b"pw", Some(&CHEAP), Some(Salt::from(vec![2u8; 16])))
            .unwrap();

        assert!(h.is_valid(b"pw"));
    }

    #[test]
    fn invalid_params_surface_from_derivation() {
        assert!(matches!(
            Hasher::new().hash_custom(b"pw", Some(&CHEAP.with_iterations(0)), None),
            Err(ArgonizeError::DerivationFailed(_))
        ));
    }

    #[test]
    fn peppered_salt_records_its_length() {
        let salt = Salt::from(vec![4u8; 16]);
        let peppered = salt.with_pepper(b"my pepper");

        let h = Hasher::new()
            .hash_custom(b"pw", Some(&CHEAP), Some(peppered.clone()))
            .unwrap();

        assert_eq!(h.params().salt_length(), 25);
        assert_eq!(h.salt(), &peppered);
        assert!(h.is_valid(b"pw"));
    }

    #[test]
    fn pepper_does_not_alter_existing_result() {
        let salt = Salt::from(vec![4u8; 16]);
        let h = Hasher::new()
            .hash_custom(b"pw", Some(&CHEAP), Some(salt.clone()))
            .unwrap();
        let before = h.encode();

        let peppered = h.salt().with_pepper(b"late pepper");

        assert_ne!(peppered.len(), h.salt().len());
        assert_eq!(h.salt(), &salt);
        assert_eq!(h.encode(), before);
        assert!(h.is_valid(b"pw"));
    }

    #[test]
    fn mismatched_key_length_fails_verification() {
        let h = hash_cheap(b"pw");
        let truncated =
            HashResult::from_parts(*h.params(), h.salt().clone(), h.key()[..16].to_vec());

        assert!(!truncated.is_valid(b"pw"));
    }

    #[test]
    fn unrunnable_params_fail_verification() {
        let h = hash_cheap(b"pw");
        let broken = HashResult::from_parts(
            h.params().with_iterations(0),
            h.salt().clone(),
            h.key().to_vec(),
        );

        assert!(!broken.is_valid(b"pw"));
    }

    #[test]
    fn debug_hides_key() {
        let h = hash_cheap(b"pw");
        let dbg = format!("{h:?}");

        assert!(dbg.contains("32 bytes"));
        assert!(dbg.contains("Salt(16 bytes)"));
    }
}
