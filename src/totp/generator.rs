//! RFC 6238 TOTP code generation (SHA-1, 30-second period, 6 digits).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use data_encoding::{Encoding, BASE32};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::errors::{Result, TfatError};

/// Length of one TOTP time step in seconds.
pub const PERIOD: u64 = 30;

/// Number of digits in a generated code.
pub const DIGITS: u32 = 6;

const MODULUS: u32 = 10u32.pow(DIGITS);

/// A generated code together with how long it stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotpCode {
    /// The code as a number in `0..1_000_000`.
    pub code: u32,
    /// Seconds until the current period ends (`1..=30`).
    pub seconds_remaining: u64,
}

impl fmt::Display for TotpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.code, width = DIGITS as usize)
    }
}

/// Compute the code for `secret` (base32, padding optional) at `unix_seconds`.
pub fn generate(secret: &str, unix_seconds: u64) -> Result<TotpCode> {
    let key = decode_secret(secret)?;

    let counter = unix_seconds / PERIOD;
    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|e| TfatError::InvalidSecret(format!("unusable HMAC key: {e}")))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let number = dynamic_truncate(&digest);

    Ok(TotpCode {
        code: number % MODULUS,
        seconds_remaining: PERIOD - (unix_seconds % PERIOD),
    })
}

/// Compute the code for `secret` at the current system time.
pub fn generate_now(secret: &str) -> Result<TotpCode> {
    generate(secret, unix_now())
}

/// Seconds since the Unix epoch (0 if the clock is before 1970).
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Canonicalize user input into the stored secret form.
///
/// Strips whitespace and trailing `=` padding, uppercases, and checks
/// that the result decodes.  Returns the unpadded uppercase string.
pub fn normalize_secret(input: &str) -> Result<String> {
    let canonical: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let canonical = canonical.trim_end_matches('=').to_string();

    decode_secret(&canonical)?;
    Ok(canonical)
}

/// Pad `secret` to a multiple of 8 characters and base32-decode it.
pub fn decode_secret(secret: &str) -> Result<Zeroizing<Vec<u8>>> {
    if secret.is_empty() {
        return Err(TfatError::InvalidSecret("secret is empty".into()));
    }

    let padded = pad_base32(secret);
    let bytes = lenient_base32()?
        .decode(padded.as_bytes())
        .map_err(|e| TfatError::InvalidSecret(format!("not valid base32: {e}")))?;

    if bytes.is_empty() {
        return Err(TfatError::InvalidSecret("secret decodes to no bytes".into()));
    }

    Ok(Zeroizing::new(bytes))
}

/// RFC 4648 base32 that ignores the unused low bits of the final
/// character.  Authenticator apps often hand out secrets whose length is
/// not a whole number of bytes, with those bits set at random.
fn lenient_base32() -> Result<Encoding> {
    let mut specification = BASE32.specification();
    specification.check_trailing_bits = false;
    specification
        .encoding()
        .map_err(|e| TfatError::InvalidSecret(format!("base32 decoder: {e}")))
}

fn pad_base32(secret: &str) -> Zeroizing<String> {
    let mut padded = Zeroizing::new(secret.to_string());
    let missing = secret.len() % 8;
    if missing != 0 {
        padded.push_str(&"=".repeat(8 - missing));
    }
    padded
}

/// RFC 4226 dynamic truncation of an HMAC-SHA1 digest.
fn dynamic_truncate(digest: &[u8]) -> u32 {
    let offset = usize::from(digest[digest.len() - 1] & 0x0F);
    u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ])
}
