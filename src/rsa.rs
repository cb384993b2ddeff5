//! Textbook RSA plus PKCS#1 v1.5 block formatting.

use crate::generate_prime;

use num_bigint::BigUint;
use rand::{rngs::StdRng, Rng};

pub struct RsaKeyPair {
    pub public: BigUint,
    pub private: BigUint,
    pub n: BigUint,
}

impl RsaKeyPair {
    /// Modulus length in whole bytes.
    pub fn modulus_len(&self) -> usize {
        ((self.n.bits() + 7) / 8) as usize
    }
}

pub fn generate_rsa_key_pair(n_bits: u64, e: &BigUint, rng: &mut StdRng) -> RsaKeyPair {
    let one = BigUint::from(1u64);

    // Retry until gcd(e, totient) = 1, otherwise e has no inverse.
    loop {
        // The key size names the size of n = p*q, so each prime gets half
        // the bits.
        let p = generate_prime(n_bits / 2, rng);
        let q = generate_prime(n_bits / 2, rng);
        if p == q {
            continue;
        }

        let n = &p * &q;
        let totient = (&p - &one) * (&q - &one);
        if greatest_common_divisor(e.clone(), totient.clone()) != one {
            continue;
        }

        if let Some(d) = e.modinv(&totient) {
            return RsaKeyPair {
                public: e.clone(),
                private: d,
                n,
            };
        }
    }
}

pub fn rsa_apply(key: &BigUint, n: &BigUint, value: &BigUint) -> BigUint {
    value.modpow(key, n)
}

/// Format `message` as a PKCS#1 v1.5 type-2 encryption block of `block_len`
/// bytes: `00 02 <nonzero padding> 00 <message>`.
///
/// Panics if the message is too long for the block; callers size their
/// messages against [`RsaKeyPair::modulus_len`].
pub fn pkcs1v15_pad(message: &[u8], block_len: usize, rng: &mut StdRng) -> Vec<u8> {
    assert!(
        message.len() + 11 <= block_len,
        "message too long for PKCS#1 v1.5 block"
    );
    let mut block = Vec::with_capacity(block_len);
    block.push(0x00);
    block.push(0x02);
    for _ in 0..(block_len - message.len() - 3) {
        loop {
            let byte: u8 = rng.gen();
            if byte != 0 {
                block.push(byte);
                break;
            }
        }
    }
    block.push(0x00);
    block.extend_from_slice(message);
    block
}

/// Extract the message from a PKCS#1 v1.5 type-2 block, or `None` if the
/// block is not conformant.
pub fn pkcs1v15_strip(block: &[u8]) -> Option<&[u8]> {
    if block.len() < 11 || block[0] != 0x00 || block[1] != 0x02 {
        return None;
    }
    let separator = block[2..].iter().position(|&byte| byte == 0x00)? + 2;
    if separator < 10 {
        // Fewer than eight padding bytes.
        return None;
    }
    Some(&block[separator + 1..])
}

/// Big-endian bytes of `x`, left-padded with zeros to exactly `len` bytes.
pub fn to_fixed_bytes_be(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    assert!(bytes.len() <= len);
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

fn greatest_common_divisor(mut a: BigUint, mut b: BigUint) -> BigUint {
    let zero = BigUint::default();
    while b != zero {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}
