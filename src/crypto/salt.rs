use std::fmt;

use zeroize::Zeroize;

use super::entropy::{EntropySource, random_bytes};
use crate::error::Result;

/// Salt bytes mixed into a derivation. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Salt(Vec<u8>);

impl Drop for Salt {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({} bytes)", self.0.len())
    }
}

impl Salt {
    /// Generate a random salt of `len` bytes.
    pub fn generate<E: EntropySource + ?Sized>(len: u32, source: &E) -> Result<Self> {
        Ok(Self(random_bytes(source, len)?))
    }

    /// Returns a new salt with `pepper` appended. `self` is left untouched.
    pub fn with_pepper(&self, pepper: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(self.0.len() + pepper.len());
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(pepper);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Salt {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Salt {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::entropy::testing::{BrokenEntropy, FixedEntropy};
    use crate::error::ArgonizeError;

    #[test]
    fn generate_uses_source() {
        let salt = Salt::generate(16, &FixedEntropy(3)).unwrap();
        assert_eq!(salt.as_bytes(), &[3u8; 16]);
    }

    #[test]
    fn generate_zero_length() {
        assert!(Salt::generate(0, &BrokenEntropy).unwrap().is_empty());
    }

    #[test]
    fn generate_propagates_failure() {
        assert!(matches!(
            Salt::generate(16, &BrokenEntropy),
            Err(ArgonizeError::RandomGenerationFailed(_))
        ));
    }

    #[test]
    fn pepper_appends_without_mutating() {
        let salt = Salt::from(vec![1u8, 2, 3]);
        let peppered = salt.with_pepper(b"xy");

        assert_eq!(peppered.as_bytes(), &[1, 2, 3, b'x', b'y']);
        assert_eq!(salt.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn empty_pepper_is_identity() {
        let salt = Salt::from(vec![9u8; 8]);
        assert_eq!(salt.with_pepper(&[]), salt);
    }

    #[test]
    fn debug_hides_bytes() {
        let salt = Salt::from(vec![0xAB; 4]);
        assert_eq!(format!("{salt:?}"), "Salt(4 bytes)");
    }
}
