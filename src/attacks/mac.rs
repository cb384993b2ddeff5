//! Length-extension forgery against secret-prefix MACs built on SHA-1 and
//! MD4.

use crate::error::AttackError;
use crate::md4::{Md4, MD4_LEN};
use crate::sha1::{Sha1, SHA1_LEN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashKind {
    Sha1,
    Md4,
}

/// A secret-prefix MAC (`hash(key || message)`), the construction the
/// length-extension attack breaks. Used as the victim in tests.
pub struct KeyedMacOracle {
    key: Vec<u8>,
    kind: HashKind,
}

impl KeyedMacOracle {
    pub fn new(key: Vec<u8>, kind: HashKind) -> Self {
        Self { key, kind }
    }

    pub fn mac(&self, message: &[u8]) -> Vec<u8> {
        let mut keyed = self.key.clone();
        keyed.extend_from_slice(message);
        digest_message(&keyed, self.kind)
    }

    pub fn verify(&self, message: &[u8], mac: &[u8]) -> bool {
        self.mac(message) == mac
    }
}

/// The padding the hash itself would append to a message of `message_len`
/// bytes: `0x80`, zeros to 56 mod 64, then the bit length (big-endian for
/// SHA-1, little-endian for MD4).
pub fn glue_padding(message_len: usize, kind: HashKind) -> Vec<u8> {
    let mut padding = vec![0x80];
    let zeros = (64 - (message_len + 9) % 64) % 64;
    padding.extend(std::iter::repeat(0x00).take(zeros));
    let bit_len = 8 * message_len as u64;
    match kind {
        HashKind::Sha1 => padding.extend_from_slice(&bit_len.to_be_bytes()),
        HashKind::Md4 => padding.extend_from_slice(&bit_len.to_le_bytes()),
    }
    padding
}

/// Resume hashing from `mac` as if `hashed_len` bytes (key, message and glue
/// padding) had already been compressed, and absorb `suffix`.
pub fn forge_mac(mac: &[u8], suffix: &[u8], hashed_len: usize, kind: HashKind) -> Vec<u8> {
    let bit_len = 8 * hashed_len as u64;
    match kind {
        HashKind::Sha1 => {
            assert_eq!(mac.len(), SHA1_LEN);
            let state: [u32; 5] = std::array::from_fn(|i| {
                u32::from_be_bytes(mac[4 * i..4 * i + 4].try_into().unwrap())
            });
            let mut hasher = Sha1::from_state(state, bit_len);
            hasher.update(suffix);
            hasher.digest().to_vec()
        }
        HashKind::Md4 => {
            assert_eq!(mac.len(), MD4_LEN);
            let state: [u32; 4] = std::array::from_fn(|i| {
                u32::from_le_bytes(mac[4 * i..4 * i + 4].try_into().unwrap())
            });
            let mut hasher = Md4::from_state(state, bit_len);
            hasher.update(suffix);
            hasher.digest().to_vec()
        }
    }
}

#[derive(Debug)]
pub struct Forgery {
    pub message: Vec<u8>,
    pub mac: Vec<u8>,
    pub key_len: usize,
}

/// Forge a MAC for `message || glue || suffix` without the key, trying key
/// lengths up to `max_key_len` against the caller's verification oracle.
pub fn length_extension_attack(
    mac: &[u8],
    message: &[u8],
    suffix: &[u8],
    kind: HashKind,
    verify: &impl Fn(&[u8], &[u8]) -> bool,
    max_key_len: usize,
) -> Result<Forgery, AttackError> {
    for key_len in 0..=max_key_len {
        let glue = glue_padding(key_len + message.len(), kind);
        let mut forged_message = message.to_vec();
        forged_message.extend_from_slice(&glue);
        forged_message.extend_from_slice(suffix);

        let hashed_len = key_len + message.len() + glue.len();
        let forged_mac = forge_mac(mac, suffix, hashed_len, kind);
        if verify(&forged_message, &forged_mac) {
            return Ok(Forgery {
                message: forged_message,
                mac: forged_mac,
                key_len,
            });
        }
    }
    Err(AttackError::OracleQueryExhausted(format!(
        "no key length up to {max_key_len} produced a verifying forgery"
    )))
}

fn digest_message(message: &[u8], kind: HashKind) -> Vec<u8> {
    match kind {
        HashKind::Sha1 => Sha1::digest_message(message).to_vec(),
        HashKind::Md4 => Md4::digest_message(message).to_vec(),
    }
}
