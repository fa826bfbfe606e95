use std::sync::OnceLock;

use secp256k1::ecdsa::Signature;
use secp256k1::{All, Message, PublicKey, SecretKey, Secp256k1};

use crate::hash::sha512_half;

/// Lazily built signing/verification context, shared across calls rather than
/// rebuilt per signature — matches the "pass an explicit `Secp256k1<C>`
/// context" idiom this ecosystem uses instead of relying on a crate-provided
/// global static.
fn context() -> &'static Secp256k1<All> {
    static CTX: OnceLock<Secp256k1<All>> = OnceLock::new();
    CTX.get_or_init(Secp256k1::new)
}

/// Non-standard signing prefix prepended to the message before hashing.
/// See §4.2: secp256k1 signs SHA-512-Half(`0x53545800` ‖ message), not the
/// raw message digest used by most secp256k1-based protocols.
pub const SIGNING_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// The digest actually signed: SHA-512-Half of the signing prefix concatenated
/// with the message bytes.
pub fn signing_hash(message: &[u8]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(SIGNING_PREFIX.len() + message.len());
    buf.extend_from_slice(&SIGNING_PREFIX);
    buf.extend_from_slice(message);
    sha512_half(&buf)
}

/// Sign `message` under the secp256k1 signing convention above. Returns a
/// DER-encoded ECDSA signature.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Vec<u8> {
    let digest = signing_hash(message);
    let msg = Message::from_digest(digest);
    let sig = context().sign_ecdsa(&msg, secret_key);
    sig.serialize_der().to_vec()
}

/// Verify a DER-encoded ECDSA signature over `message` against `public_key`.
///
/// DER signatures always begin with the sequence tag `0x30`; a signature
/// missing that tag is rejected before attempting a full parse.
pub fn verify(public_key: &PublicKey, message: &[u8], der_signature: &[u8]) -> bool {
    if der_signature.first() != Some(&0x30) {
        return false;
    }
    let Ok(sig) = Signature::from_der(der_signature) else {
        return false;
    };
    let digest = signing_hash(message);
    let Ok(msg) = Message::from_digest_slice(&digest) else {
        return false;
    };
    sig.verify(&msg, public_key).is_ok()
}
