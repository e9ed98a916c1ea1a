pub mod b64;
pub mod crypto_utils;
