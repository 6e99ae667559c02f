//! Cryptographic building blocks for password hashing.
//!
//! Provides the Argon2id parameter model, key derivation, salts and the
//! injectable source of random bytes.

pub mod entropy;
pub mod kdf;
pub mod salt;

pub use entropy::{EntropyError, EntropySource, OsEntropy, random_bytes};
pub use kdf::{ParameterSet, derive_key};
pub use salt::Salt;

/// Argon2 algorithm revision produced and accepted by this crate (0x13 = 19).
pub const ARGON2_VERSION: u32 = argon2::Version::V0x13 as u32;
/// Default salt length (16 bytes / 128 bits).
pub const SALT_LEN: u32 = 16;
/// Default derived key length (32 bytes / 256 bits).
pub const KEY_LEN: u32 = 32;
/// Shortest salt accepted when decoding an encoded hash.
pub const MIN_SALT_LEN: usize = 8;
/// Longest salt or key accepted when decoding an encoded hash.
pub const MAX_FIELD_LEN: usize = i32::MAX as usize;
