//! DSA private-key recovery from misused nonces: repeated nonces across two
//! signatures, and nonces drawn from a small range.

use crate::dsa::{hash_message, sign_with_nonce, DsaParameters, DsaSignature};
use crate::error::AttackError;

use num_bigint::BigUint;
use num_traits::One;

/// A message together with its DSA signature, as captured off the wire.
pub struct SignedMessage {
    pub msg: Vec<u8>,
    pub r: BigUint,
    pub s: BigUint,
}

impl SignedMessage {
    pub fn new(msg: impl Into<Vec<u8>>, signature: &DsaSignature) -> Self {
        Self {
            msg: msg.into(),
            r: signature.r.clone(),
            s: signature.s.clone(),
        }
    }
}

/// Recover the private key from two signatures made with the same nonce.
///
/// A shared nonce shows up as a shared `r`; then
/// `k = (h1 - h2) / (s1 - s2) mod q` and the key follows from either
/// signature. The recovered key is validated by re-deriving one of the
/// signatures.
pub fn recover_key_from_nonce_reuse(
    params: &DsaParameters,
    first: &SignedMessage,
    second: &SignedMessage,
) -> Result<BigUint, AttackError> {
    if first.r != second.r {
        return Err(AttackError::InvariantViolation(
            "signatures have different r values, so their nonces differ".into(),
        ));
    }
    let q = &params.q;
    let h1 = hash_message(&first.msg) % q;
    let h2 = hash_message(&second.msg) % q;

    let s_diff_inv = sub_mod(&first.s, &second.s, q)
        .modinv(q)
        .ok_or_else(|| {
            AttackError::InvariantViolation("s1 - s2 is not invertible mod q".into())
        })?;
    let nonce = (sub_mod(&h1, &h2, q) * s_diff_inv) % q;

    let key = recover_key_from_known_nonce(params, first, &nonce)?;

    let rederived = sign_with_nonce(params, &key, &nonce, &first.msg);
    let matches = rederived
        .map(|sig| sig.r == first.r && sig.s == first.s)
        .unwrap_or(false);
    if !matches {
        return Err(AttackError::InvariantViolation(
            "recovered key does not reproduce the captured signature".into(),
        ));
    }
    Ok(key)
}

/// Recover the private key from one signature whose nonce is known:
/// `x = (s*k - h) / r mod q`.
pub fn recover_key_from_known_nonce(
    params: &DsaParameters,
    signed: &SignedMessage,
    nonce: &BigUint,
) -> Result<BigUint, AttackError> {
    let q = &params.q;
    let h = hash_message(&signed.msg) % q;
    let r_inv = signed.r.modinv(q).ok_or_else(|| {
        AttackError::InvariantViolation("r is not invertible mod q".into())
    })?;
    let s_k = (&signed.s * nonce) % q;
    Ok((sub_mod(&s_k, &h, q) * r_inv) % q)
}

/// Brute-force a nonce known to lie in `1..=max_nonce`, returning the nonce
/// and the private key.
///
/// Tracks `g^k mod p` incrementally, one modular multiplication per
/// candidate, and confirms a hit by checking the derived key against the
/// signer's public key.
pub fn recover_key_from_bounded_nonce(
    params: &DsaParameters,
    public: &BigUint,
    signed: &SignedMessage,
    max_nonce: u64,
) -> Result<(BigUint, BigUint), AttackError> {
    let mut r_candidate = BigUint::one();
    for k in 1..=max_nonce {
        r_candidate = (r_candidate * &params.g) % &params.p;
        if &r_candidate % &params.q != signed.r {
            continue;
        }
        let nonce = BigUint::from(k);
        let key = recover_key_from_known_nonce(params, signed, &nonce)?;
        if params.g.modpow(&key, &params.p) == *public {
            return Ok((nonce, key));
        }
    }
    Err(AttackError::OracleQueryExhausted(format!(
        "no nonce up to {max_nonce} matches the signature"
    )))
}

fn sub_mod(a: &BigUint, b: &BigUint, q: &BigUint) -> BigUint {
    ((a % q) + q - (b % q)) % q
}
