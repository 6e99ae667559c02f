//! The PHC string form of an Argon2id hash.
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=4$<base64 salt>$<base64 key>
//! ```
//!
//! Salt and key use the standard base64 alphabet without padding.

use base64::{Engine, prelude::BASE64_STANDARD_NO_PAD};
use tracing::debug;

use crate::{
    crypto::{ARGON2_VERSION, MAX_FIELD_LEN, MIN_SALT_LEN, ParameterSet, Salt},
    error::{ArgonizeError, Result},
    hashed::HashResult,
};

/// Algorithm identifier written in the second segment.
pub const VARIANT: &str = "argon2id";

/// Number of `$`-separated segments, counting the empty one before the leading `$`.
const SEGMENTS: usize = 6;

pub fn encode(hash: &HashResult) -> String {
    let params = hash.params();

    format!(
        "${VARIANT}$v={ARGON2_VERSION}$m={},t={},p={}${}${}",
        params.memory_cost_kib(),
        params.iterations(),
        params.parallelism(),
        BASE64_STANDARD_NO_PAD.encode(hash.salt()),
        BASE64_STANDARD_NO_PAD.encode(hash.key()),
    )
}

/// Decodes a PHC string. Salt and key lengths in the returned parameters are
/// the decoded byte counts.
///
/// # Errors
///
/// Each stage fails with its own [`ArgonizeError`] variant, checked in order:
/// segment count, version syntax, version value, cost parameters, salt
/// base64, key base64, then salt/key lengths.
pub fn decode(encoded: &str) -> Result<HashResult> {
    let decoded = decode_segments(encoded);

    match &decoded {
        Ok(hash) => debug!(
            m = hash.params().memory_cost_kib(),
            t = hash.params().iterations(),
            p = hash.params().parallelism(),
            "decoded encoded hash"
        ),
        Err(e) => debug!(error = %e, "rejected encoded hash"),
    }
    decoded
}

fn decode_segments(encoded: &str) -> Result<HashResult> {
    let segments: Vec<&str> = encoded.split('$').collect();
    if segments.len() != SEGMENTS {
        return Err(ArgonizeError::MalformedFormat {
            segments: segments.len(),
        });
    }

    let version = parse_version(segments[2])?;
    if version != i64::from(ARGON2_VERSION) {
        return Err(ArgonizeError::IncompatibleVersion {
            found: version,
            expected: ARGON2_VERSION,
        });
    }

    let (memory_cost_kib, iterations, parallelism) = parse_costs(segments[3])?;

    let salt = BASE64_STANDARD_NO_PAD
        .decode(segments[4])
        .map_err(ArgonizeError::SaltDecodeFailed)?;
    let key = BASE64_STANDARD_NO_PAD
        .decode(segments[5])
        .map_err(ArgonizeError::KeyDecodeFailed)?;

    // No lower bound on the key: the stored key length decides what verification derives.
    if salt.len() < MIN_SALT_LEN || salt.len() > MAX_FIELD_LEN || key.len() > MAX_FIELD_LEN {
        return Err(ArgonizeError::LengthOutOfRange {
            salt: salt.len(),
            key: key.len(),
        });
    }

    // both fit: MAX_FIELD_LEN < u32::MAX
    let params = ParameterSet::new(
        iterations,
        memory_cost_kib,
        parallelism,
        salt.len() as u32,
        key.len() as u32,
    );

    Ok(HashResult::from_parts(params, Salt::from(salt), key))
}

/// Parses `v=<integer>`. The whole segment must match: `v=19x` is rejected
/// rather than read as 19.
fn parse_version(segment: &str) -> Result<i64> {
    segment
        .strip_prefix("v=")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ArgonizeError::VersionParseFailed(segment.to_string()))
}

/// Parses `m=<u32>,t=<u32>,p=<u8>` in exactly that order. Trailing text or
/// extra fields such as `,k=1` are rejected, unlike scanf-style parsers that
/// stop after the last matched field.
fn parse_costs(segment: &str) -> Result<(u32, u32, u8)> {
    let missing = || ArgonizeError::MissingParameters(segment.to_string());

    let mut fields = segment.split(',');
    let mut next = |prefix: &str| {
        fields
            .next()
            .and_then(|field| field.strip_prefix(prefix))
            .ok_or_else(missing)
    };

    let m = next("m=")?.parse::<u32>().map_err(|_| missing())?;
    let t = next("t=")?.parse::<u32>().map_err(|_| missing())?;
    let p = next("p=")?.parse::<u8>().map_err(|_| missing())?;

    if fields.next().is_some() {
        return Err(missing());
    }

    Ok((m, t, p))
}
