use getrandom::fill;

use crate::error::{ArgonizeError, Result};

/// Error reported by an [`EntropySource`].
pub type EntropyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A source of cryptographically secure random bytes.
///
/// Salt generation takes the source as a parameter, so tests can swap in a
/// deterministic or failing implementation without touching global state.
pub trait EntropySource {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> std::result::Result<(), EntropyError>;
}

/// The operating system's random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> std::result::Result<(), EntropyError> {
        fill(buf).map_err(|e| format!("OS random generator unavailable: {e}").into())
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &E {
    fn fill(&self, buf: &mut [u8]) -> std::result::Result<(), EntropyError> {
        (**self).fill(buf)
    }
}

/// Returns `len` random bytes read from `source`.
///
/// A zero length returns an empty vector without consulting the source.
pub fn random_bytes<E: EntropySource + ?Sized>(source: &E, len: u32) -> Result<Vec<u8>> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut buf = vec![0u8; len as usize];
    source
        .fill(&mut buf)
        .map_err(ArgonizeError::RandomGenerationFailed)?;
    Ok(buf)
}
