//! Plaintext encoding of the account map.
//!
//! Accounts are stored as a flat TOML table of `name = "SECRET"` pairs.
//! `BTreeMap` keeps the keys sorted so the same map always encodes to
//! the same bytes.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::errors::{Result, TfatError};

/// Encode the account map into plaintext bytes.
pub fn encode(accounts: &BTreeMap<String, String>) -> Result<Zeroizing<Vec<u8>>> {
    let text = toml::to_string(accounts)
        .map_err(|e| TfatError::CorruptData(format!("cannot encode accounts: {e}")))?;
    Ok(Zeroizing::new(text.into_bytes()))
}

/// Decode plaintext bytes back into the account map.
pub fn decode(bytes: &[u8]) -> Result<BTreeMap<String, String>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TfatError::CorruptData(format!("accounts are not valid UTF-8: {e}")))?;

    toml::from_str(text).map_err(|e| TfatError::CorruptData(format!("accounts TOML: {e}")))
}
