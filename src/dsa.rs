//! DSA over the fixed cryptopals parameter set, with a nonce-injectable
//! signing path so the attacks can manufacture degenerate signatures.

use crate::sha1::Sha1;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{Num, Zero};
use rand::rngs::StdRng;

pub struct DsaParameters {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

impl DsaParameters {
    pub fn defaults() -> Self {
        let p = BigUint::from_str_radix(
            "800000000000000089e1855218a0e7dac38136ffafa72eda7859f2171e25e6\
            5eac698c1702578b07dc2a1076da241c76c62d374d8389ea5aeffd3226a053\
            0cc565f3bf6b50929139ebeac04f48c3c84afb796d61e5a4f9a8fda812ab59\
            494232c7d2b4deb50aa18ee9e132bfa85ac4374d7f9091abc3d015efc871a5\
            84471bb1",
            16,
        )
        .unwrap();
        let q = BigUint::from_str_radix("f4f47f05794b256174bba6e9b396a7707e563c5b", 16).unwrap();
        let g = BigUint::from_str_radix(
            "5958c9d3898b224b12672c0b98e06c60df923cb8bc999d119458fef538b8fa\
            4046c8db53039db620c094c9fa077ef389b5322a559946a71903f990f1f7e0\
            e025e2d7f7cf494aff1a0470f5b64c36b625a097f1651fe775323556fe00b3\
            608c887892878480e99041be601a62166ca6894bdd41a7054ec89f756ba9fc\
            95302291",
            16,
        )
        .unwrap();
        Self { p, q, g }
    }
}

pub struct DsaKeyPair {
    pub public: BigUint,
    pub private: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DsaSignature {
    pub r: BigUint,
    pub s: BigUint,
}

pub fn generate_dsa_key_pair(params: &DsaParameters, rng: &mut StdRng) -> DsaKeyPair {
    let one = BigUint::from(1u64);
    let private = rng.gen_biguint_range(&one, &params.q);
    let public = params.g.modpow(&private, &params.p);
    DsaKeyPair { public, private }
}

pub fn hash_message(message: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&Sha1::digest_message(message))
}

/// Sign with a caller-supplied nonce. Returns `None` when the nonce yields a
/// degenerate r or s, in which case callers pick a fresh nonce.
pub fn sign_with_nonce(
    params: &DsaParameters,
    private: &BigUint,
    nonce: &BigUint,
    message: &[u8],
) -> Option<DsaSignature> {
    let r = params.g.modpow(nonce, &params.p) % &params.q;
    if r.is_zero() {
        return None;
    }
    let nonce_inv = nonce.modinv(&params.q)?;
    let s = (nonce_inv * (hash_message(message) + private * &r)) % &params.q;
    if s.is_zero() {
        return None;
    }
    Some(DsaSignature { r, s })
}

pub fn sign(
    params: &DsaParameters,
    private: &BigUint,
    message: &[u8],
    rng: &mut StdRng,
) -> DsaSignature {
    let one = BigUint::from(1u64);
    loop {
        let nonce = rng.gen_biguint_range(&one, &params.q);
        if let Some(signature) = sign_with_nonce(params, private, &nonce, message) {
            return signature;
        }
    }
}

pub fn verify(
    params: &DsaParameters,
    public: &BigUint,
    message: &[u8],
    signature: &DsaSignature,
) -> bool {
    if signature.r.is_zero()
        || signature.r >= params.q
        || signature.s.is_zero()
        || signature.s >= params.q
    {
        return false;
    }
    let w = match signature.s.modinv(&params.q) {
        Some(w) => w,
        None => return false,
    };
    let u1 = (hash_message(message) * &w) % &params.q;
    let u2 = (&signature.r * &w) % &params.q;
    let v = ((params.g.modpow(&u1, &params.p) * public.modpow(&u2, &params.p)) % &params.p)
        % &params.q;
    v == signature.r
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;

    #[test]
    fn sign_then_verify_accepts_signature() {
        let params = DsaParameters::defaults();
        let mut rng = StdRng::from_seed([42; 32]);
        let keys = generate_dsa_key_pair(&params, &mut rng);
        let message = b"For those that envy a MC it can be hazardous to your health";

        let signature = sign(&params, &keys.private, message, &mut rng);

        assert!(verify(&params, &keys.public, message, &signature));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let params = DsaParameters::defaults();
        let mut rng = StdRng::from_seed([42; 32]);
        let keys = generate_dsa_key_pair(&params, &mut rng);

        let signature = sign(&params, &keys.private, b"So I shall test you with this rhythm", &mut rng);

        assert!(!verify(&params, &keys.public, b"So I shall test you with this riddim", &signature));
    }

    #[test]
    fn verify_rejects_signature_from_other_key() {
        let params = DsaParameters::defaults();
        let mut rng = StdRng::from_seed([42; 32]);
        let keys = generate_dsa_key_pair(&params, &mut rng);
        let other_keys = generate_dsa_key_pair(&params, &mut rng);
        let message = b"listen up";

        let signature = sign(&params, &keys.private, message, &mut rng);

        assert!(!verify(&params, &other_keys.public, message, &signature));
    }

    #[test]
    fn verify_rejects_out_of_range_signature_values() {
        let params = DsaParameters::defaults();
        let mut rng = StdRng::from_seed([42; 32]);
        let keys = generate_dsa_key_pair(&params, &mut rng);
        let message = b"listen up";

        let mut signature = sign(&params, &keys.private, message, &mut rng);
        signature.r = BigUint::zero();

        assert!(!verify(&params, &keys.public, message, &signature));
    }
}
