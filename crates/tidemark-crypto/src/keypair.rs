use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::hash::account_id_from_pubkey;

/// An Ed25519 keypair with an AccountID derived from the verifying key.
///
/// `ed25519_dalek::SigningKey` is built with its own `zeroize` feature, so the
/// signing key material is wiped on drop without this crate depending on
/// `zeroize` directly; `Debug` never prints key material.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh Ed25519 keypair using the operating system RNG.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }

    /// Restore a keypair from a 32-byte seed (e.g. loaded from a wallet file).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The 32-byte Ed25519 verifying (public) key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The AccountID derived from this keypair's public key, per §4.2.
    pub fn account_id(&self) -> [u8; 20] {
        account_id_from_pubkey(&self.public_key())
    }

    /// Sign `message` with this keypair's signing key. Returns a 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair {{ account_id: {:?} }}", hex::encode(self.account_id()))
    }
}

/// Verify an Ed25519 signature over `message` against a 32-byte public key.
pub fn verify(public_key: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(vk) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let sig = Signature::from_bytes(signature);
    vk.verify(message, &sig).is_ok()
}
