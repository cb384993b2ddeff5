//! English plaintext scoring, used to pick the winning candidate when an
//! attack produces one plausible plaintext per key guess.

use crate::xor::xor_with_key;

use rayon::prelude::*;

// http://practicalcryptography.com/cryptanalysis/letter-frequencies-various-languages/english-letter-frequencies/
const LETTER_FREQUENCIES: [f64; 26] = [
    0.08551690673195275,   // A
    0.016047959168228293,  // B
    0.03164435380900101,   // C
    0.03871183735737418,   // D
    0.1209652247516903,    // E
    0.021815103969122528,  // F
    0.020863354250923158,  // G
    0.04955707280570641,   // H
    0.0732511860723129,    // I
    0.002197788956104563,  // J
    0.008086975227142329,  // K
    0.04206464329306453,   // L
    0.025263217360184446,  // M
    0.07172184876283856,   // N
    0.07467265410810447,   // O
    0.020661660788966266,  // P
    0.0010402453014323196, // Q
    0.0633271013284023,    // R
    0.06728203117491646,   // S
    0.08938126949659495,   // T
    0.026815809362304373,  // U
    0.01059346274662571,   // V
    0.018253618950416498,  // W
    0.0019135048594134572, // X
    0.017213606152473405,  // Y
    0.001137563214703838,  // Z
];

// Weight of the penalty for each byte outside printable ASCII.
const GARBAGE_WEIGHT: f64 = 8.0;

pub struct XorCrackResult {
    pub key: u8,
    pub message: String,
    pub score: f64,
}

/// Try every single-byte XOR key and return the candidate whose plaintext
/// looks most like English.
pub fn brute_force_byte_xor_cipher(bytes: &[u8]) -> XorCrackResult {
    let (score, key, message) = (0..=255u8)
        .into_par_iter()
        .map(|key| {
            let decrypted = xor_with_key(bytes, key);
            (score_english_by_frequency(&decrypted), key, decrypted)
        })
        .reduce(
            || (f64::NEG_INFINITY, 0, Vec::new()),
            |best, candidate| {
                if candidate.0 > best.0 {
                    candidate
                } else {
                    best
                }
            },
        );

    XorCrackResult {
        key,
        message: String::from_utf8_lossy(&message).into_owned(),
        score,
    }
}

/// Score how closely `bytes` resembles English prose; higher is better.
///
/// Letters are case-folded and chi-squared-tested against the reference
/// frequencies, spaces count toward the prose fraction, and every byte
/// outside printable ASCII is penalised. A key guess differing from the true
/// key only in the case bit turns each space into a control byte, so the
/// penalty keeps the two apart even though their letter counts match.
pub fn score_english_by_frequency(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }

    let mut letter_counts = [0u32; 26];
    let mut spaces = 0u32;
    let mut garbage = 0u32;
    for &b in bytes {
        match b {
            b'a'..=b'z' => letter_counts[(b - b'a') as usize] += 1,
            b'A'..=b'Z' => letter_counts[(b - b'A') as usize] += 1,
            b' ' => spaces += 1,
            b'\t' | b'\n' | b'\r' => {}
            0x20..=0x7e => {}
            _ => garbage += 1,
        }
    }

    let len = bytes.len() as f64;
    let letters: u32 = letter_counts.iter().sum();
    let prose = (letters + spaces) as f64 / len;
    let junk = GARBAGE_WEIGHT * garbage as f64 / len;

    if letters == 0 {
        return prose - junk;
    }

    let mut chi = 0.0;
    for (&count, &freq) in letter_counts.iter().zip(&LETTER_FREQUENCIES) {
        let expected = freq * letters as f64;
        chi += (count as f64 - expected).powi(2) / expected;
    }
    // Per-letter normalisation keeps short and long inputs comparable.
    prose - chi / (50.0 * letters as f64) - junk
}
