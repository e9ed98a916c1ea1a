// Соль и сравнение хешей

use crate::error::Result;
use rand::rngs::OsRng;
use rand_core::RngCore;
use subtle::ConstantTimeEq;

/// Fills a fresh buffer of `len` bytes from the OS random source.
///
/// An RNG failure is reported as [`PasswordError::RandomSource`](crate::error::PasswordError)
/// rather than falling back to a weaker salt.
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    OsRng.try_fill_bytes(&mut salt)?;
    Ok(salt)
}

/// Constant-time equality. Slices of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
