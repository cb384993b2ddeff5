//! Bleichenbacher's adaptive chosen-ciphertext attack against PKCS#1 v1.5
//! RSA encryption, driven by a padding-conformance oracle.

use crate::error::AttackError;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

/// Closed interval of candidate plaintext integers.
type Interval = (BigUint, BigUint);

struct BudgetedOracle<'a, F> {
    oracle: &'a mut F,
    queries: u64,
    max_queries: u64,
}

impl<F: FnMut(&BigUint) -> bool> BudgetedOracle<'_, F> {
    fn query(&mut self, ciphertext: &BigUint) -> Result<bool, AttackError> {
        if self.queries >= self.max_queries {
            return Err(AttackError::BudgetExceeded {
                queries: self.queries,
            });
        }
        self.queries += 1;
        Ok((self.oracle)(ciphertext))
    }
}

/// Recover the PKCS#1 v1.5 encryption block (as an integer) behind
/// `ciphertext`, given an oracle reporting padding conformance of chosen
/// ciphertexts.
pub fn bleichenbacher_attack(
    ciphertext: &BigUint,
    e: &BigUint,
    n: &BigUint,
    oracle: &mut impl FnMut(&BigUint) -> bool,
) -> Result<BigUint, AttackError> {
    bleichenbacher_attack_with_budget(ciphertext, e, n, oracle, u64::MAX)
}

/// [`bleichenbacher_attack`] with a hard cap on oracle queries; exceeding
/// the cap aborts with [`AttackError::BudgetExceeded`].
pub fn bleichenbacher_attack_with_budget(
    ciphertext: &BigUint,
    e: &BigUint,
    n: &BigUint,
    oracle: &mut impl FnMut(&BigUint) -> bool,
    max_queries: u64,
) -> Result<BigUint, AttackError> {
    let k = ((n.bits() + 7) / 8) as u32;
    // B = 2^(8(k-2)): the weight of one byte below the two leading ones.
    let b_bound = BigUint::one() << (8 * (k - 2));
    let two_b = &b_bound * 2u32;
    let three_b = &b_bound * 3u32;

    let mut oracle = BudgetedOracle {
        oracle,
        queries: 0,
        max_queries,
    };

    if !oracle.query(ciphertext)? {
        return Err(AttackError::InvariantViolation(
            "initial ciphertext is not PKCS#1 v1.5 conforming".into(),
        ));
    }

    let mut intervals: Vec<Interval> = vec![(two_b.clone(), &three_b - 1u32)];

    // Step 2a: the smallest useful multiplier is n / 3B.
    let mut s = div_ceil(n, &three_b);
    while !multiplier_conforms(ciphertext, &s, e, n, &mut oracle)? {
        s += 1u32;
    }
    intervals = refine_intervals(&intervals, &s, n, &two_b, &three_b)?;

    loop {
        if let [(a, b)] = intervals.as_slice() {
            if a == b {
                return Ok(a.clone());
            }
        }

        s = if intervals.len() > 1 {
            // Step 2b: plain linear search.
            let mut next = &s + 1u32;
            while !multiplier_conforms(ciphertext, &next, e, n, &mut oracle)? {
                next += 1u32;
            }
            next
        } else {
            step_2c(ciphertext, &s, &intervals[0], e, n, &two_b, &three_b, &mut oracle)?
        };
        intervals = refine_intervals(&intervals, &s, n, &two_b, &three_b)?;
    }
}

fn multiplier_conforms<F: FnMut(&BigUint) -> bool>(
    ciphertext: &BigUint,
    s: &BigUint,
    e: &BigUint,
    n: &BigUint,
    oracle: &mut BudgetedOracle<F>,
) -> Result<bool, AttackError> {
    let probe = (ciphertext * s.modpow(e, n)) % n;
    oracle.query(&probe)
}

/// Step 2c: with a single interval `[a, b]` left, jump `r` so that roughly
/// one conforming `s` exists per `r`, halving the interval per round.
#[allow(clippy::too_many_arguments)]
fn step_2c<F: FnMut(&BigUint) -> bool>(
    ciphertext: &BigUint,
    s_prev: &BigUint,
    interval: &Interval,
    e: &BigUint,
    n: &BigUint,
    two_b: &BigUint,
    three_b: &BigUint,
    oracle: &mut BudgetedOracle<F>,
) -> Result<BigUint, AttackError> {
    let (a, b) = interval;
    let mut r = div_ceil(&((b * s_prev - two_b) * 2u32), n);
    loop {
        let r_n = &r * n;
        let s_lo = div_ceil(&(two_b + &r_n), b);
        let s_hi = div_ceil(&(three_b + &r_n), a);
        let mut s = s_lo;
        while s < s_hi {
            if multiplier_conforms(ciphertext, &s, e, n, oracle)? {
                return Ok(s);
            }
            s += 1u32;
        }
        r += 1u32;
    }
}

/// Step 3: intersect the current intervals with the constraints implied by a
/// conforming multiplier `s`.
fn refine_intervals(
    intervals: &[Interval],
    s: &BigUint,
    n: &BigUint,
    two_b: &BigUint,
    three_b: &BigUint,
) -> Result<Vec<Interval>, AttackError> {
    let n_int = BigInt::from_biguint(Sign::Plus, n.clone());
    let mut refined: Vec<Interval> = Vec::new();

    for (a, b) in intervals {
        // a*s - 3B + 1 can go negative; compute the r bounds signed and
        // clamp at zero.
        let a_s = BigInt::from_biguint(Sign::Plus, a * s);
        let b_s = BigInt::from_biguint(Sign::Plus, b * s);
        let three_b_int = BigInt::from_biguint(Sign::Plus, three_b.clone());
        let two_b_int = BigInt::from_biguint(Sign::Plus, two_b.clone());

        let r_hi = int_div_floor(&(b_s - &two_b_int), &n_int);
        if r_hi.sign() == Sign::Minus {
            continue;
        }
        let r_lo = int_div_ceil(&(a_s - three_b_int + 1), &n_int)
            .max(BigInt::zero());

        let mut r = r_lo.to_biguint().unwrap_or_default();
        let r_hi = r_hi.to_biguint().unwrap_or_default();
        while r <= r_hi {
            let r_n = &r * n;
            let lower = div_ceil(&(two_b + &r_n), s).max(a.clone());
            let upper = div_floor(&(three_b - 1u32 + r_n), s).min(b.clone());
            if lower <= upper {
                refined.push((lower, upper));
            }
            r += 1u32;
        }
    }

    if refined.is_empty() {
        return Err(AttackError::InvariantViolation(
            "interval set emptied; oracle answers are inconsistent".into(),
        ));
    }
    merge_intervals(&mut refined);
    Ok(refined)
}

fn merge_intervals(intervals: &mut Vec<Interval>) {
    intervals.sort();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for (lower, upper) in intervals.drain(..) {
        match merged.last_mut() {
            Some((_, last_upper)) if lower <= *last_upper => {
                if upper > *last_upper {
                    *last_upper = upper;
                }
            }
            _ => merged.push((lower, upper)),
        }
    }
    *intervals = merged;
}

fn div_ceil(a: &BigUint, b: &BigUint) -> BigUint {
    (a + b - 1u32) / b
}

fn div_floor(a: &BigUint, b: &BigUint) -> BigUint {
    a / b
}

// b is always positive here; only a may be negative.
fn int_div_floor(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    if (a % b).sign() == Sign::Minus {
        q - 1
    } else {
        q
    }
}

fn int_div_ceil(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    if (a % b).sign() == Sign::Plus {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rsa::{
        generate_rsa_key_pair, pkcs1v15_pad, pkcs1v15_strip, rsa_apply, to_fixed_bytes_be,
    };

    use rand::{rngs::StdRng, SeedableRng};

    fn conformance_oracle(
        private: BigUint,
        n: BigUint,
        modulus_len: usize,
    ) -> impl FnMut(&BigUint) -> bool {
        move |ciphertext: &BigUint| {
            let block = to_fixed_bytes_be(&rsa_apply(&private, &n, ciphertext), modulus_len);
            block[0] == 0x00 && block[1] == 0x02
        }
    }

    #[test]
    fn recovers_message_from_padding_oracle() {
        let mut rng = StdRng::from_seed([47; 32]);
        let e = BigUint::from(65537u64);
        let keys = generate_rsa_key_pair(128, &e, &mut rng);
        let k = keys.modulus_len();

        let block = pkcs1v15_pad(b"kick", k, &mut rng);
        let message = BigUint::from_bytes_be(&block);
        let ciphertext = rsa_apply(&keys.public, &keys.n, &message);
        let mut oracle = conformance_oracle(keys.private.clone(), keys.n.clone(), k);

        let recovered = bleichenbacher_attack(&ciphertext, &e, &keys.n, &mut oracle).unwrap();

        assert_eq!(recovered, message);
        let recovered_block = to_fixed_bytes_be(&recovered, k);
        assert_eq!(pkcs1v15_strip(&recovered_block), Some(b"kick".as_slice()));
    }

    #[test]
    fn rejects_non_conforming_initial_ciphertext() {
        let mut rng = StdRng::from_seed([48; 32]);
        let e = BigUint::from(65537u64);
        let keys = generate_rsa_key_pair(128, &e, &mut rng);
        let k = keys.modulus_len();

        // An unpadded message almost surely lacks the 00 02 prefix.
        let message = BigUint::from_bytes_be(b"plain");
        let ciphertext = rsa_apply(&keys.public, &keys.n, &message);
        let mut oracle = conformance_oracle(keys.private.clone(), keys.n.clone(), k);

        let err = bleichenbacher_attack(&ciphertext, &e, &keys.n, &mut oracle).unwrap_err();

        assert!(matches!(err, AttackError::InvariantViolation(_)));
    }

    #[test]
    fn query_budget_aborts_the_attack() {
        let mut rng = StdRng::from_seed([49; 32]);
        let e = BigUint::from(65537u64);
        let keys = generate_rsa_key_pair(128, &e, &mut rng);
        let k = keys.modulus_len();

        let block = pkcs1v15_pad(b"kick", k, &mut rng);
        let message = BigUint::from_bytes_be(&block);
        let ciphertext = rsa_apply(&keys.public, &keys.n, &message);
        let mut oracle = conformance_oracle(keys.private.clone(), keys.n.clone(), k);

        let err =
            bleichenbacher_attack_with_budget(&ciphertext, &e, &keys.n, &mut oracle, 10)
                .unwrap_err();

        assert!(matches!(err, AttackError::BudgetExceeded { queries: 10 }));
    }
}
