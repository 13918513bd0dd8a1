// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook signature verification.
//!
//! GitHub signs the raw request body with HMAC-SHA1 keyed by the target's
//! shared secret and offers the digest as `X-Hub-Signature: sha1=<hex>`.
//! Verification is constant-time with respect to the digest bytes; every
//! malformed input degrades to a plain `false`, never an error.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// The header scheme prefix the offered signature must carry.
const SCHEME_PREFIX: &str = "sha1=";

/// Verifies an offered `sha1=<hex>` signature against the body.
///
/// Returns `false` for an empty secret, a missing or malformed prefix,
/// non-hex or wrong-length digests, and mismatches. The digest comparison
/// is performed by [`Mac::verify_slice`], which is constant-time.
pub fn verify(secret: &[u8], body: &[u8], offered: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Some(hex_digest) = offered.strip_prefix(SCHEME_PREFIX) else {
        return false;
    };

    let Ok(digest) = hex::decode(hex_digest) else {
        return false;
    };

    // HMAC accepts keys of any length; new_from_slice only fails for
    // pathological lengths that cannot occur here.
    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&digest).is_ok()
}

/// Computes the canonical `sha1=<hex>` signature for a body.
///
/// This is what a well-behaved sender puts in `X-Hub-Signature`; it exists
/// so operators and tests can produce valid requests.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return String::from(SCHEME_PREFIX);
    };
    mac.update(body);
    format!("{}{}", SCHEME_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
