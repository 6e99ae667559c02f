//! Argon2id password hashing with the standard PHC string encoding.
//!
//! ```no_run
//! let hashed = argonize::hash(b"my password")?;
//! let stored = hashed.to_string(); // $argon2id$v=19$m=65536,t=3,p=4$...
//!
//! let decoded: argonize::HashResult = stored.parse()?;
//! assert!(decoded.is_valid(b"my password"));
//! assert!(!decoded.is_valid(b"wrong password"));
//! # Ok::<(), argonize::ArgonizeError>(())
//! ```

mod crypto;
mod error;
mod format;
mod hashed;

pub use crate::crypto::{
    ARGON2_VERSION, EntropyError, EntropySource, KEY_LEN, OsEntropy, ParameterSet, SALT_LEN, Salt,
    derive_key,
};
pub use crate::error::{ArgonizeError, Result};
pub use crate::format::phc::VARIANT;
pub use crate::hashed::{HashResult, Hasher};

/// Hash `password` with the default parameters and a random salt from the OS.
///
/// Note that this is deliberately expensive in both memory and CPU.
pub fn hash(password: &[u8]) -> Result<HashResult> {
    Hasher::new().hash(password)
}

/// Hash `password` with optional parameters and salt. See [`Hasher::hash_custom`].
pub fn hash_custom(
    password: &[u8],
    params: Option<&ParameterSet>,
    salt: Option<Salt>,
) -> Result<HashResult> {
    Hasher::new().hash_custom(password, params, salt)
}

/// Returns `len` cryptographically secure random bytes from the OS.
///
/// A zero length returns an empty vector.
pub fn random_bytes(len: u32) -> Result<Vec<u8>> {
    crypto::random_bytes(&OsEntropy, len)
}

/// Decodes a PHC string produced by [`HashResult::encode`].
pub fn decode(encoded: &str) -> Result<HashResult> {
    HashResult::decode(encoded)
}

/// Decodes the opaque byte form produced by [`HashResult::to_bytes`].
pub fn deserialize(data: &[u8]) -> Result<HashResult> {
    HashResult::from_bytes(data)
}
