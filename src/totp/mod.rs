//! TOTP code generation.
//!
//! This module provides:
//! - The RFC 6238 generator and secret validation (`generator`)
//! - The live once-per-second display loop (`ticker`)

pub mod generator;
pub mod ticker;

pub use generator::{
    decode_secret, generate, generate_now, normalize_secret, unix_now, TotpCode, DIGITS, PERIOD,
};
pub use ticker::{watch, Clock, SystemClock, Tick};
