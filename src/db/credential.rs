//! Stored credential hashes.
//!
//! Format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`. A fresh random
//! salt per credential; verification compares in constant time.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

pub const CREDENTIAL_ITERATIONS: u32 = 100_000;
pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

fn derive(credential: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut out = Zeroizing::new([0u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(credential.as_bytes(), salt, iterations, &mut out[..]);
    out
}

pub fn hash_credential(credential: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(credential, &salt, CREDENTIAL_ITERATIONS);
    format!(
        "{SCHEME}${CREDENTIAL_ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(&hash[..])
    )
}

/// True when `credential` matches `stored`. Malformed stored values never match.
pub fn verify_credential(credential: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(expected)) else {
        return false;
    };
    if iterations == 0 || expected.len() != HASH_LENGTH {
        return false;
    }
    let actual = derive(credential, &salt, iterations);
    actual[..].ct_eq(&expected[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash_credential("password123");
        assert!(stored.starts_with("pbkdf2-sha256$100000$"));
        assert!(verify_credential("password123", &stored));
        assert!(!verify_credential("password124", &stored));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash_credential("same"), hash_credential("same"));
    }

    #[test]
    fn malformed_never_matches() {
        assert!(!verify_credential("x", ""));
        assert!(!verify_credential("x", "plain-text"));
        assert!(!verify_credential("x", "pbkdf2-sha256$abc$AAAA$AAAA"));
        assert!(!verify_credential("x", "md5$1$AAAA$AAAA"));
        assert!(!verify_credential("x", "pbkdf2-sha256$1$AAAA$AAAA$extra"));
    }
}
