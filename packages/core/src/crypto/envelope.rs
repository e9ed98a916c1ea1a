//! Envelope grammar shared by the composite schemes and the dispatcher.
//!
//! Composite envelope:
//!
//! ```text
//! k1=v1,k2=v2,...$<base64 salt>$<base64 hash>
//! ```
//!
//! The parameter block is positional: each scheme emits its keys in a fixed order and
//! parses them back in that same order. Routed envelope: `{<scheme id>}<inner envelope>`.

use crate::error::{PasswordError, Result};
use crate::utils::b64;
use std::str::FromStr;

const SEGMENT_SEPARATOR: char = '$';
const FIELD_SEPARATOR: char = ',';
const KEY_VALUE_SEPARATOR: char = '=';

/// The three `$`-delimited parts of a composite envelope, still undecoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeParts<'a> {
    pub params: &'a str,
    pub salt: &'a str,
    pub hash: &'a str,
}

impl<'a> CompositeParts<'a> {
    /// Splits on `$`; anything other than exactly three segments is `InvalidFormat`.
    pub fn split(encoded: &'a str) -> Result<Self> {
        let mut segments = encoded.split(SEGMENT_SEPARATOR);
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(params), Some(salt), Some(hash), None) => Ok(Self { params, salt, hash }),
            _ => Err(PasswordError::InvalidFormat),
        }
    }

    pub fn decode_salt(&self) -> Result<Vec<u8>> {
        b64::decode(self.salt)
    }

    pub fn decode_hash(&self) -> Result<Vec<u8>> {
        b64::decode(self.hash)
    }
}

/// Reads a parameter block whose keys must be exactly `keys`, in order.
///
/// Returns the raw values positionally. Missing, extra, reordered or empty
/// fields are `InvalidFormat`.
pub fn parse_params<'a, const N: usize>(block: &'a str, keys: [&str; N]) -> Result<[&'a str; N]> {
    let mut values = [""; N];
    let mut fields = block.split(FIELD_SEPARATOR);

    for (slot, expected) in values.iter_mut().zip(keys) {
        let field = fields.next().ok_or(PasswordError::InvalidFormat)?;
        let (key, value) = field
            .split_once(KEY_VALUE_SEPARATOR)
            .ok_or(PasswordError::InvalidFormat)?;
        if key != expected || value.is_empty() {
            return Err(PasswordError::InvalidFormat);
        }
        *slot = value;
    }

    if fields.next().is_some() {
        return Err(PasswordError::InvalidFormat);
    }
    Ok(values)
}

/// Parses one numeric parameter value.
pub fn parse_number<T: FromStr>(value: &str) -> Result<T> {
    value.parse().map_err(|_| PasswordError::InvalidFormat)
}

/// Formats `params` in the given order, then appends base64 salt and hash.
pub fn format_composite(params: &[(&str, String)], salt: &[u8], hash: &[u8]) -> String {
    let block = params
        .iter()
        .map(|(key, value)| format!("{key}{KEY_VALUE_SEPARATOR}{value}"))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{block}{SEGMENT_SEPARATOR}{}{SEGMENT_SEPARATOR}{}",
        b64::encode(salt),
        b64::encode(hash)
    )
}

/// Prepends the routing prefix: `{id}inner`.
pub fn format_routed(id: &str, inner: &str) -> String {
    format!("{{{id}}}{inner}")
}

/// Splits `{id}inner` into `(id, inner)`.
///
/// The envelope must start with `{`; the id runs up to the first `}`.
pub fn split_routed(encoded: &str) -> Result<(&str, &str)> {
    let rest = encoded.strip_prefix('{').ok_or(PasswordError::InvalidFormat)?;
    rest.split_once('}').ok_or(PasswordError::InvalidFormat)
}
