//! MD5 digest rendering matching the Java source's `new
//! BigInteger(1, digest).toString(16)` idiom: unsigned big-integer hex
//! with no leading-zero padding. This diverges from the usual
//! fixed-width 32-char lowercase hex, but clients tolerate it and the
//! spec (SPEC_FULL §9) preserves it intentionally.

use md5::{Digest, Md5};

pub fn md5_bigint_hex(bytes: &[u8]) -> String {
    let digest = Md5::digest(bytes);
    let full: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
