use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the presented token.
pub fn token_digest(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Compares the digest of the presented token against the configured
/// digest. The comparison runs over every byte regardless of where the
/// first mismatch occurs.
pub fn verify_token(presented: &str, expected_digest_hex: &str) -> bool {
    constant_time_eq(
        token_digest(presented).as_bytes(),
        expected_digest_hex.as_bytes(),
    )
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("diamond-admin-2024")
    const DIGEST: &str = "36d53f5758e91aa0cfd956f43eec7469cf8a36c49b789fa13ab3b3d478cbb415";

    #[test]
    fn accepts_matching_token() {
        assert!(verify_token("diamond-admin-2024", DIGEST));
    }

    #[test]
    fn rejects_wrong_token() {
        assert!(!verify_token("diamond-admin-2023", DIGEST));
        assert!(!verify_token("", DIGEST));
    }

    #[test]
    fn rejects_digest_passed_as_token() {
        assert!(!verify_token(DIGEST, DIGEST));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = token_digest("diamond-admin-2024");
        assert_eq!(digest, DIGEST);
        assert_eq!(digest.len(), 64);
    }
}
