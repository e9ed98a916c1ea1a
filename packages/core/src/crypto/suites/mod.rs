//! Схемы хеширования паролей (Password Schemes)
//!
//! Each module implements [`PasswordEncoder`](crate::crypto::provider::PasswordEncoder)
//! for one algorithm.
//!
//! ## Доступные схемы
//!
//! | ID | Encoder | Envelope |
//! |----|---------|----------|
//! | `bcrypt` | [`self::bcrypt::BcryptPasswordEncoder`] | native `$2b$<cost>$...` string |
//! | `scrypt` | [`self::scrypt::ScryptPasswordEncoder`] | `N=..,r=..,p=..,keyLen=..$salt$hash` |
//! | `argon2` | [`self::argon2::Argon2PasswordEncoder`] | `time=..,memory=..,threads=..,keyLen=..$salt$hash` |
//! | `pbkdf2` | [`self::pbkdf2::Pbkdf2PasswordEncoder`] | `iterations=..,keyLen=..,hashFunc=..$salt$hash` |
//! | `noop` | [`self::noop::NoOpPasswordEncoder`] | plaintext, tests only |
//!
//! ## Пример
//!
//! ```rust
//! use passforge_core::crypto::provider::PasswordEncoder;
//! use passforge_core::crypto::suites::pbkdf2::{Pbkdf2Params, Pbkdf2PasswordEncoder};
//!
//! let encoder = Pbkdf2PasswordEncoder::new(Pbkdf2Params {
//!     iterations: 1000,
//!     ..Pbkdf2Params::default()
//! })?;
//! let encoded = encoder.encode("hunter2")?;
//! assert!(encoder.verify("hunter2", &encoded)?);
//! # Ok::<(), passforge_core::error::PasswordError>(())
//! ```

pub mod argon2;
pub mod bcrypt;
pub mod noop;
pub mod pbkdf2;
pub mod scrypt;

/// Zero means "not set": substitute the documented default.
pub(crate) fn non_zero_or<T: Default + PartialEq>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}
