//! Byte layout v1 for serialized hashes.
//!
//! V1 Layout (integers little-endian):
//! ```text
//! MAGIC (4) | VERSION (1) | TIME_COST (4) | MEM_COST (4) | PARALLELISM (1)
//!   | SALT_LENGTH (4) | KEY_LENGTH (4) | SALT_LEN (4) | SALT | KEY_LEN (4) | KEY
//! ```
//!
//! `SALT_LENGTH` and `KEY_LENGTH` are the parameter set's recorded lengths;
//! `SALT_LEN` and `KEY_LEN` prefix the actual bytes.

use super::{MAGIC, MAGIC_LEN, VER_LEN};
use crate::{
    crypto::{ParameterSet, Salt},
    error::{ArgonizeError, Result},
    hashed::HashResult,
};

/// Byte layout version.
pub const VERSION_V1: u8 = 1;

const TIME_LEN: usize = 4;
const MEM_LEN: usize = 4;
const PAR_LEN: usize = 1;
const LENGTH_FIELD_LEN: usize = 4;

const HEADER_LEN: usize =
    MAGIC_LEN + VER_LEN + TIME_LEN + MEM_LEN + PAR_LEN + 2 * LENGTH_FIELD_LEN;

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| ArgonizeError::DeserializeFailed("input truncated".into()))?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.u32()? as usize;
        self.take(len)
    }
}

/// Parses v1 bytes.
///
/// # Errors
///
/// Returns an error if the input is truncated or carries trailing bytes.
pub fn parse(data: &[u8]) -> Result<HashResult> {
    if data.len() < HEADER_LEN {
        return Err(ArgonizeError::DeserializeFailed(
            "input too short for v1".into(),
        ));
    }

    let mut reader = Reader {
        data,
        offset: MAGIC_LEN + VER_LEN,
    };

    let iterations = reader.u32()?;
    let memory_cost_kib = reader.u32()?;
    let parallelism = reader.u8()?;
    let salt_length = reader.u32()?;
    let key_length = reader.u32()?;

    let salt = Salt::from(reader.prefixed()?);
    let key = reader.prefixed()?.to_vec();

    if reader.offset != data.len() {
        return Err(ArgonizeError::DeserializeFailed(format!(
            "{} trailing bytes",
            data.len() - reader.offset
        )));
    }

    let params = ParameterSet::new(
        iterations,
        memory_cost_kib,
        parallelism,
        salt_length,
        key_length,
    );

    Ok(HashResult::from_parts(params, salt, key))
}

/// Serializes a hash to v1 bytes.
///
/// # Errors
///
/// Returns an error if the salt or key is too long to length-prefix.
pub fn serialize(hash: &HashResult) -> Result<Vec<u8>> {
    let salt = hash.salt().as_bytes();
    let key = hash.key();

    let out_of_range = || ArgonizeError::LengthOutOfRange {
        salt: salt.len(),
        key: key.len(),
    };
    let salt_len = u32::try_from(salt.len()).map_err(|_| out_of_range())?;
    let key_len = u32::try_from(key.len()).map_err(|_| out_of_range())?;

    let params = hash.params();
    let mut buf =
        Vec::with_capacity(HEADER_LEN + 2 * LENGTH_FIELD_LEN + salt.len() + key.len());

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_V1);

    buf.extend_from_slice(&params.iterations().to_le_bytes());
    buf.extend_from_slice(&params.memory_cost_kib().to_le_bytes());
    buf.push(params.parallelism());
    buf.extend_from_slice(&params.salt_length().to_le_bytes());
    buf.extend_from_slice(&params.key_length().to_le_bytes());

    buf.extend_from_slice(&salt_len.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(&key_len.to_le_bytes());
    buf.extend_from_slice(key);

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_roundtrip_keeps_recorded_lengths() {
        // recorded lengths deliberately disagree with the actual bytes
        let h = HashResult::from_parts(
            ParameterSet::new(2, 19456, 1, 12, 64),
            Salt::from(vec![3u8; 20]),
            vec![4u8; 32],
        );

        let bytes = serialize(&h).unwrap();
        let parsed = parse(&bytes).unwrap();

        assert_eq!(parsed.params().salt_length(), 12);
        assert_eq!(parsed.params().key_length(), 64);
        assert_eq!(parsed.salt().len(), 20);
        assert_eq!(parsed, h);
    }

    #[test]
    fn layout_is_stable() {
        let h = HashResult::from_parts(
            ParameterSet::new(1, 8, 1, 2, 1),
            Salt::from(vec![0xAA, 0xBB]),
            vec![0xCC],
        );

        let bytes = serialize(&h).unwrap();

        assert_eq!(
            bytes,
            [
                b'A', b'G', b'N', b'Z', 1, // magic, version
                1, 0, 0, 0, // t
                8, 0, 0, 0, // m
                1, // p
                2, 0, 0, 0, // salt length
                1, 0, 0, 0, // key length
                2, 0, 0, 0, 0xAA, 0xBB, // salt
                1, 0, 0, 0, 0xCC, // key
            ]
        );
    }

    #[test]
    fn truncated_input_fails() {
        let h = HashResult::from_parts(
            ParameterSet::default(),
            Salt::from(vec![1u8; 16]),
            vec![2u8; 32],
        );
        let bytes = serialize(&h).unwrap();

        assert!(parse(&bytes[..bytes.len() - 1]).is_err());
        assert!(parse(&bytes[..HEADER_LEN]).is_err());
    }

    #[test]
    fn trailing_bytes_fail() {
        let h = HashResult::from_parts(
            ParameterSet::default(),
            Salt::from(vec![1u8; 16]),
            vec![2u8; 32],
        );
        let mut bytes = serialize(&h).unwrap();
        bytes.push(0);

        assert!(matches!(parse(&bytes), Err(ArgonizeError::DeserializeFailed(_))));
    }

    #[test]
    fn oversized_length_prefix_fails() {
        let mut data = vec![0u8; HEADER_LEN];
        data[..4].copy_from_slice(MAGIC);
        data[4] = VERSION_V1;
        data.extend_from_slice(&u32::MAX.to_le_bytes());

        assert!(parse(&data).is_err());
    }
}
