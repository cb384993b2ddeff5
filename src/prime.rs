//! Probabilistic prime testing and generation for the RSA and DSA key sizes
//! used in the attack demonstrations.

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::StdRng;

const MILLER_RABIN_ROUNDS: u32 = 5;

const SMALL_ODD_PRIMES: [u32; 54] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257,
];

pub fn is_likely_prime(candidate: &BigUint, rng: &mut StdRng) -> bool {
    let zero = BigUint::default();
    let two = BigUint::from(2u64);
    if candidate <= &BigUint::one() {
        return false;
    }
    if candidate == &two {
        return true;
    }
    if !candidate.bit(0) {
        return false;
    }

    for small_prime in SMALL_ODD_PRIMES {
        let p = BigUint::from(small_prime);
        if candidate == &p {
            return true;
        }
        if (candidate % &p) == zero {
            return false;
        }
    }

    miller_rabin(candidate, MILLER_RABIN_ROUNDS, rng)
}

/// Generate a random probable prime of exactly `bit_len` bits.
pub fn generate_prime(bit_len: u64, rng: &mut StdRng) -> BigUint {
    let top_bit = BigUint::one() << (bit_len - 1);
    loop {
        let mut candidate = rng.gen_biguint(bit_len);
        // Pin the top bit for the full width and the low bit for oddness.
        candidate |= &top_bit;
        candidate |= BigUint::one();
        if is_likely_prime(&candidate, rng) {
            return candidate;
        }
    }
}

fn miller_rabin(candidate: &BigUint, n_rounds: u32, rng: &mut StdRng) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u64);

    let mut d: BigUint = candidate - &one;
    let mut r = 0;
    while !d.bit(0) {
        d >>= 1;
        r += 1;
    }
    'witness: for _ in 0..n_rounds {
        let a = rng.gen_biguint_range(&two, &(candidate - &two));
        let mut x = a.modpow(&d, candidate);
        if x == one || x == candidate - &one {
            continue;
        }
        for _ in 0..(r - 1) {
            x = x.modpow(&two, candidate);
            if x == candidate - &one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_traits::Num;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(BigUint::from(2u64))]
    #[case(BigUint::from(37u64))]
    #[case(BigUint::from(65537u64))]
    #[case(BigUint::from_str_radix(
        "122918091607895345462109112013423411099284103879272281586\
        0819946412949055199827238447096054805339148543003066133719\
        9085275880150614723662649630584506204331", 10).unwrap())
    ]
    fn is_likely_prime_identifies_primes(#[case] prime: BigUint) {
        let mut rng = StdRng::from_seed([101; 32]);

        assert!(is_likely_prime(&prime, &mut rng));
    }

    #[rstest]
    #[case(BigUint::from(0u64))]
    #[case(BigUint::from(1u64))]
    #[case(BigUint::from(4u64))]
    #[case(BigUint::from(1024u64))]
    #[case(BigUint::from(1025u64))]
    #[case(BigUint::from(3u64) * BigUint::from(65537u64))]
    fn is_likely_prime_identifies_non_primes(#[case] non_prime: BigUint) {
        let mut rng = StdRng::from_seed([101; 32]);

        assert!(!is_likely_prime(&non_prime, &mut rng));
    }

    #[test]
    fn generate_prime_returns_prime_of_requested_width() {
        let mut rng = StdRng::from_seed([7; 32]);

        let prime = generate_prime(128, &mut rng);

        assert_eq!(prime.bits(), 128);
        assert!(is_likely_prime(&prime, &mut rng));
    }
}
