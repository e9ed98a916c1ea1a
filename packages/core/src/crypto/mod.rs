//! Криптографический модуль
//!
//! # Архитектура
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              DelegatingPasswordEncoder                      │
//! │  - encode: default scheme, tagged "{id}"                    │
//! │  - verify: route by "{id}" prefix                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              PasswordEncoder (Crypto-Agility)               │
//! │  - bcrypt   (native envelope)                               │
//! │  - scrypt / argon2 / pbkdf2 (params$salt$hash envelope)     │
//! │  - noop     (tests only)                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Модули
//!
//! - [`provider`]: PasswordEncoder trait and stable scheme ids
//! - [`envelope`]: envelope grammar (composite and routed)
//! - [`suites`]: scheme implementations
//! - [`delegating`]: the dispatcher

/// PasswordEncoder trait для crypto-agility
pub mod provider;

pub mod envelope;

/// Схемы хеширования (bcrypt, scrypt, argon2, pbkdf2, noop)
pub mod suites;

pub mod delegating;

// ============================================================================
// Re-exports для удобства
// ============================================================================

pub use delegating::{DelegatingPasswordEncoder, EncoderRegistry};
pub use provider::PasswordEncoder;
