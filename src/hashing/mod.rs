//! BLAKE3 helpers shared by the stub extractors and the model registry.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for log correlation and for seeding deterministic stub vectors. Collisions only
/// cost a misleading log line or two stub embeddings that happen to agree, so 64 bits is
/// plenty; use [`media_digest`] when the full digest matters.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Full 32-byte digest of an uploaded media sample.
#[inline]
pub fn media_digest(media: &[u8]) -> [u8; 32] {
    *blake3::hash(media).as_bytes()
}

/// Order-sensitive fingerprint of a labelled training corpus.
///
/// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
pub fn corpus_fingerprint<'a, I>(samples: I) -> [u8; 32]
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut hasher = Hasher::new();
    for (text, label) in samples {
        for field in [text, label] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
    }
    *hasher.finalize().as_bytes()
}

/// Hex rendering of a digest, for logs and status payloads.
pub fn to_hex(digest: &[u8; 32]) -> String {
    blake3::Hash::from_bytes(*digest).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_to_u64_deterministic() {
        assert_eq!(hash_to_u64(b"probe"), hash_to_u64(b"probe"));
        assert_ne!(hash_to_u64(b"probe"), hash_to_u64(b"probe2"));
    }

    #[test]
    fn test_media_digest_matches_blake3() {
        assert_eq!(media_digest(b"abc"), *blake3::hash(b"abc").as_bytes());
    }

    #[test]
    fn test_corpus_fingerprint_is_boundary_safe() {
        let a = corpus_fingerprint([("ab", "c")]);
        let b = corpus_fingerprint([("a", "bc")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_corpus_fingerprint_is_order_sensitive() {
        let a = corpus_fingerprint([("x", "1"), ("y", "2")]);
        let b = corpus_fingerprint([("y", "2"), ("x", "1")]);
        assert_ne!(a, b);
        assert_eq!(a, corpus_fingerprint([("x", "1"), ("y", "2")]));
    }

    #[test]
    fn test_to_hex_length() {
        assert_eq!(to_hex(&media_digest(b"")).len(), 64);
    }
}
