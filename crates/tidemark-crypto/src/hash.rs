use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// SHA-512-Half: the first 32 bytes of a SHA-512 digest.
///
/// This is the canonical hash used throughout ledger hashing, transaction
/// identification, and secp256k1 signing digests.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let full = Sha512::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&full[..32]);
    out
}

/// Standard RIPEMD-160 digest, 20 bytes.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let digest = Ripemd160::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// Derive a 20-byte AccountID from a raw public key as RIPEMD-160(SHA-256(pubkey)).
pub fn account_id_from_pubkey(pubkey_bytes: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(pubkey_bytes);
    ripemd160(&sha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_half_is_32_bytes_of_sha512() {
        let full = Sha512::digest(b"abc");
        let half = sha512_half(b"abc");
        assert_eq!(&full[..32], &half[..]);
    }

    #[test]
    fn ripemd160_matches_known_vector() {
        // RIPEMD-160("") = 9c1185a5c5e9fc54612808977ee8f548b2258d31
        let digest = ripemd160(b"");
        assert_eq!(
            hex::encode(digest),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn account_id_is_20_bytes() {
        let id = account_id_from_pubkey(b"some-public-key-bytes");
        assert_eq!(id.len(), 20);
    }
}
