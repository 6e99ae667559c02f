//! Encodings of a [`HashResult`].
//!
//! [`phc`] holds the canonical `$argon2id$...` string codec. The functions in
//! this module handle the opaque byte form, a version-tagged binary layout
//! meant only for this crate's own round trips.

use tracing::debug;

use crate::error::{ArgonizeError, Result};
use crate::hashed::HashResult;

pub mod phc;
pub mod v1;

/// Magic bytes identifying a serialized hash ("AGNZ").
pub const MAGIC: &[u8; 4] = b"AGNZ";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 4;
/// Length of version field.
pub const VER_LEN: usize = 1;

/// Parses the opaque byte form back into a [`HashResult`].
///
/// Automatically dispatches to the appropriate version parser.
///
/// # Errors
///
/// Returns [`ArgonizeError::DeserializeFailed`] if:
/// - The input is too short
/// - The magic bytes are invalid
/// - The version is unsupported
/// - The layout does not match its declared lengths
pub fn parse(data: &[u8]) -> Result<HashResult> {
    if data.len() < MAGIC_LEN + VER_LEN {
        return Err(ArgonizeError::DeserializeFailed("input too short".into()));
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(ArgonizeError::DeserializeFailed("invalid magic".into()));
    }

    let version = data[MAGIC_LEN];

    let parsed = match version {
        1 => v1::parse(data),
        _ => Err(ArgonizeError::DeserializeFailed(format!(
            "unsupported version {version}"
        ))),
    };

    if let Err(e) = &parsed {
        debug!(error = %e, "rejected serialized hash");
    }
    parsed
}

/// Serializes a [`HashResult`] with the latest byte layout (v1).
///
/// # Errors
///
/// Returns [`ArgonizeError::EmptyKey`] if the result holds no key.
pub fn serialize(hash: &HashResult) -> Result<Vec<u8>> {
    if hash.key().is_empty() {
        return Err(ArgonizeError::EmptyKey);
    }

    v1::serialize(hash)
}
