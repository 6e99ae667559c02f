use thiserror::Error;

use crate::crypto::EntropyError;

/// Errors produced while hashing, encoding or decoding Argon2id hashes.
#[derive(Debug, Error)]
pub enum ArgonizeError {
    #[error("the password is empty")]
    EmptyPassword,

    #[error("failed to generate random bytes")]
    RandomGenerationFailed(#[source] EntropyError),

    #[error("argon2 key derivation failed: {0}")]
    DerivationFailed(#[source] argon2::Error),

    #[error("invalid hash format: expected 6 '$'-separated segments, got {segments}")]
    MalformedFormat { segments: usize },

    #[error("failed to parse the version from '{0}'")]
    VersionParseFailed(String),

    #[error("incompatible version of Argon2: found {found}, expected {expected}")]
    IncompatibleVersion { found: i64, expected: u32 },

    #[error("missing parameters in the hash: '{0}'")]
    MissingParameters(String),

    #[error("failed to decode salt value")]
    SaltDecodeFailed(#[source] base64::DecodeError),

    #[error("failed to decode hash value")]
    KeyDecodeFailed(#[source] base64::DecodeError),

    #[error("hash or salt length is too long or too short (salt: {salt} bytes, key: {key} bytes)")]
    LengthOutOfRange { salt: usize, key: usize },

    #[error("hash value is empty")]
    EmptyKey,

    #[error("failed to deserialize the hash: {0}")]
    DeserializeFailed(String),
}

pub type Result<T> = std::result::Result<T, ArgonizeError>;
