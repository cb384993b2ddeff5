//! MT19937 state recovery: untempering observed outputs, cloning a live
//! generator, and seed search for the MT19937 stream cipher.

use crate::error::AttackError;
use crate::mt19937::{Mt19937, MT19937_STATE_LEN};

/// Invert MT19937's tempering, recovering the raw state word behind one
/// output.
pub fn untemper(value: u32) -> u32 {
    let mut word = invert_right_shift_xor(value, 18);
    word = invert_left_shift_and_xor(word, 15, 0xefc6_0000);
    word = invert_left_shift_and_xor(word, 7, 0x9d2c_5680);
    invert_right_shift_xor(word, 11)
}

/// Rebuild a generator from exactly 624 consecutive outputs. The clone's
/// next output matches the victim's 625th.
pub fn clone_generator(outputs: &[u32; MT19937_STATE_LEN]) -> Mt19937 {
    Mt19937::from_state(outputs.map(untemper))
}

/// As [`clone_generator`], for a stream captured into a slice.
pub fn clone_from_outputs(outputs: &[u32]) -> Result<Mt19937, AttackError> {
    let state: &[u32; MT19937_STATE_LEN] = outputs
        .get(..MT19937_STATE_LEN)
        .and_then(|window| window.try_into().ok())
        .ok_or_else(|| {
            AttackError::InvariantViolation(format!(
                "need {MT19937_STATE_LEN} outputs to rebuild the state, got {}",
                outputs.len()
            ))
        })?;
    Ok(clone_generator(state))
}

/// Stream cipher keyed by an MT19937 seed; each word yields four
/// little-endian keystream bytes. Encryption and decryption are the same
/// operation.
pub fn mt19937_stream_cipher(message: &[u8], seed: u32) -> Vec<u8> {
    let mut rng = Mt19937::new(seed);
    let mut key_stream = Vec::with_capacity(message.len() + 3);
    while key_stream.len() < message.len() {
        key_stream.extend_from_slice(&rng.generate().to_le_bytes());
    }
    message
        .iter()
        .zip(key_stream)
        .map(|(m, k)| m ^ k)
        .collect()
}

/// Find the cipher seed by trial decryption over `seeds`, looking for
/// `known_plaintext` at `known_offset`.
pub fn recover_stream_seed(
    ciphertext: &[u8],
    known_plaintext: &[u8],
    known_offset: usize,
    seeds: impl IntoIterator<Item = u32>,
) -> Result<u32, AttackError> {
    let window = known_offset..known_offset + known_plaintext.len();
    for seed in seeds {
        let decrypted = mt19937_stream_cipher(ciphertext, seed);
        if decrypted.get(window.clone()) == Some(known_plaintext) {
            return Ok(seed);
        }
    }
    Err(AttackError::OracleQueryExhausted(
        "no seed in the search space reproduces the known plaintext".into(),
    ))
}

/// Recover a timestamp used as an MT19937 seed, given the generator's
/// `output_index`-th raw output. Searches backwards second by second from
/// `latest_timestamp`.
pub fn recover_timestamp_seed(
    observed_output: u32,
    output_index: usize,
    latest_timestamp: u32,
    max_age_secs: u32,
) -> Result<u32, AttackError> {
    let earliest = latest_timestamp.saturating_sub(max_age_secs);
    for timestamp in (earliest..=latest_timestamp).rev() {
        let mut rng = Mt19937::new(timestamp);
        for _ in 0..output_index {
            rng.generate();
        }
        if rng.generate() == observed_output {
            return Ok(timestamp);
        }
    }
    Err(AttackError::OracleQueryExhausted(format!(
        "no timestamp within {max_age_secs}s reproduces the output"
    )))
}

fn invert_right_shift_xor(value: u32, shift: u32) -> u32 {
    let mut original = value;
    loop {
        let next = value ^ (original >> shift);
        if next == original {
            return next;
        }
        original = next;
    }
}

fn invert_left_shift_and_xor(value: u32, shift: u32, mask: u32) -> u32 {
    let mut original = value;
    loop {
        let next = value ^ ((original << shift) & mask);
        if next == original {
            return next;
        }
        original = next;
    }
}
