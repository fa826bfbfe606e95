pub mod hash;
pub mod keypair;
pub mod secp256k1;

pub use hash::{account_id_from_pubkey, ripemd160, sha512_half};
pub use keypair::{verify as verify_ed25519, KeyPair};
