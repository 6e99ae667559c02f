use argon2::{Algorithm, Argon2, Params, Version};
use serde::Serialize;

use super::{KEY_LEN, SALT_LEN};
use crate::error::{ArgonizeError, Result};

/// Cost and shape of one Argon2id hash operation.
///
/// Construction never validates: nonsensical values such as zero iterations
/// are accepted here and rejected by [`derive_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterSet {
    iterations: u32,
    memory_cost_kib: u32,
    parallelism: u8,
    salt_length: u32,
    key_length: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::RFC9106_SECOND
    }
}

impl ParameterSet {
    /// RFC 9106 "first recommended": one pass over 2 GiB. Less time, more memory.
    pub const RFC9106_FIRST: ParameterSet = ParameterSet {
        iterations: 1,
        memory_cost_kib: 2 * 1024 * 1024, // 2 GiB
        parallelism: 4,
        salt_length: SALT_LEN,
        key_length: KEY_LEN,
    };

    /// RFC 9106 "second recommended": three passes over 64 MiB. The default.
    pub const RFC9106_SECOND: ParameterSet = ParameterSet {
        iterations: 3,
        memory_cost_kib: 64 * 1024, // 64 MiB
        parallelism: 4,
        salt_length: SALT_LEN,
        key_length: KEY_LEN,
    };

    pub const fn new(
        iterations: u32,
        memory_cost_kib: u32,
        parallelism: u8,
        salt_length: u32,
        key_length: u32,
    ) -> Self {
        Self {
            iterations,
            memory_cost_kib,
            parallelism,
            salt_length,
            key_length,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn memory_cost_kib(&self) -> u32 {
        self.memory_cost_kib
    }

    pub fn parallelism(&self) -> u8 {
        self.parallelism
    }

    pub fn salt_length(&self) -> u32 {
        self.salt_length
    }

    pub fn key_length(&self) -> u32 {
        self.key_length
    }

    pub fn with_iterations(self, iterations: u32) -> Self {
        Self { iterations, ..self }
    }

    pub fn with_memory_cost_kib(self, memory_cost_kib: u32) -> Self {
        Self {
            memory_cost_kib,
            ..self
        }
    }

    pub fn with_parallelism(self, parallelism: u8) -> Self {
        Self {
            parallelism,
            ..self
        }
    }

    pub fn with_salt_length(self, salt_length: u32) -> Self {
        Self {
            salt_length,
            ..self
        }
    }

    pub fn with_key_length(self, key_length: u32) -> Self {
        Self { key_length, ..self }
    }
}

/// Derive `params.key_length()` bytes from `password` and `salt` with Argon2id v0x13.
///
/// Parameters the algorithm cannot run with (zero iterations, memory below
/// 8 KiB per lane, salt shorter than 8 bytes, ...) surface as
/// [`ArgonizeError::DerivationFailed`].
pub fn derive_key(password: &[u8], salt: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
    let argon_params = Params::new(
        params.memory_cost_kib,
        params.iterations,
        u32::from(params.parallelism),
        Some(params.key_length as usize),
    )
    .map_err(ArgonizeError::DerivationFailed)?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = vec![0u8; params.key_length as usize];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(ArgonizeError::DerivationFailed)?;

    Ok(key)
}
