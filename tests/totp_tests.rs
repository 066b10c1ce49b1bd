//! Integration tests for TOTP code generation.

use tfat::errors::TfatError;
use tfat::totp::{self, PERIOD};

/// RFC 6238 SHA-1 seed `12345678901234567890` in base32.
const RFC_SEED: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

#[test]
fn rfc6238_sha1_table() {
    // Appendix B values truncated to the last six digits.
    let vectors: [(u64, &str); 6] = [
        (59, "287082"),
        (1_111_111_109, "081804"),
        (1_111_111_111, "050471"),
        (1_234_567_890, "005924"),
        (2_000_000_000, "279037"),
        (20_000_000_000, "353130"),
    ];

    for (t, expected) in vectors {
        let code = totp::generate(RFC_SEED, t).unwrap();
        assert_eq!(code.to_string(), expected, "t={t}");
    }
}

#[test]
fn ten_byte_seed_is_a_different_key() {
    let code = totp::generate("GEZDGNBVGY3TQOJQ", 59).unwrap();
    assert_eq!(code.to_string(), "263420");
}

#[test]
fn short_secrets_are_padded() {
    assert_eq!(totp::generate("MFRGG", 0).unwrap().to_string(), "670717");
    assert_eq!(
        totp::generate("JBSWY3DPEHPK3PXP", 1000).unwrap().to_string(),
        "475209"
    );
}

#[test]
fn same_code_for_whole_window() {
    let start = 1_700_000_010 - (1_700_000_010 % PERIOD);
    let first = totp::generate(RFC_SEED, start).unwrap();

    for offset in 0..PERIOD {
        let code = totp::generate(RFC_SEED, start + offset).unwrap();
        assert_eq!(code.code, first.code);
        assert_eq!(code.seconds_remaining, PERIOD - offset);
    }

    let next = totp::generate(RFC_SEED, start + PERIOD).unwrap();
    assert_eq!(next.seconds_remaining, PERIOD);
}

#[test]
fn normalized_input_gives_the_same_code() {
    let messy = "gezd gnbv gy3t qojq gezd gnbv gy3t qojq";
    let normalized = totp::normalize_secret(messy).unwrap();
    assert_eq!(normalized, RFC_SEED);
    assert_eq!(totp::generate(&normalized, 59).unwrap().to_string(), "287082");
}

#[test]
fn invalid_secrets_are_rejected() {
    for bad in ["not-base32!!", "", "   ", "1890"] {
        assert!(
            matches!(totp::normalize_secret(bad), Err(TfatError::InvalidSecret(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn secrets_with_unused_trailing_bits_are_accepted() {
    for secret in ["JBSWY3DPEHPK3PXPJBSWY3DPEB", "JBSWY3DPEHPK3PXPJBSWY3DPEH", "MFRGH"] {
        let normalized = totp::normalize_secret(secret).unwrap();
        assert_eq!(normalized, secret);
        assert!(totp::generate(&normalized, 59).is_ok());
    }

    // Only the leftover bits differ, so the key and the codes are the same.
    assert_eq!(
        totp::generate("MFRGH", 0).unwrap().to_string(),
        totp::generate("MFRGG", 0).unwrap().to_string()
    );
}
