//! CBC attacks: plaintext bit-flipping through ciphertext edits, and full
//! plaintext recovery from a padding oracle.

use crate::error::AttackError;
use crate::modes::BLOCK_SIZE;
use crate::pkcs7::pkcs7_unpad;

/// Flip bytes of CBC plaintext by editing the preceding ciphertext block.
///
/// `known` is the plaintext currently at `target_offset`, `desired` what it
/// should decrypt to instead. The edited ciphertext block's own plaintext is
/// scrambled; callers aim the edit at a block they control.
pub fn flip_cbc_plaintext(
    ciphertext: &mut [u8],
    target_offset: usize,
    known: &[u8],
    desired: &[u8],
) {
    assert_eq!(known.len(), desired.len());
    assert!(target_offset >= BLOCK_SIZE);
    assert!(target_offset + known.len() <= ciphertext.len());
    for (i, (k, d)) in known.iter().zip(desired).enumerate() {
        ciphertext[target_offset - BLOCK_SIZE + i] ^= k ^ d;
    }
}

/// Decrypt a CBC ciphertext using only a padding oracle.
///
/// The oracle reports whether `(ciphertext, iv)` decrypts to a valid PKCS#7
/// message. Each byte is recovered by forcing the previous block so that a
/// candidate plaintext byte turns into the padding value; the candidate that
/// validates is the plaintext byte itself.
pub fn cbc_padding_oracle_attack(
    ciphertext: &[u8],
    iv: &[u8],
    oracle: &impl Fn(&[u8], &[u8]) -> bool,
    block_len: usize,
) -> Result<Vec<u8>, AttackError> {
    if block_len < 2 || block_len > 255 || iv.len() != block_len {
        return Err(AttackError::InvariantViolation(
            "block length must be 2..=255 and match the IV length".into(),
        ));
    }
    if ciphertext.is_empty() || ciphertext.len() % block_len != 0 {
        return Err(AttackError::InvariantViolation(
            "ciphertext length is not a whole number of blocks".into(),
        ));
    }

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut prev: &[u8] = iv;
    for (block_idx, block) in ciphertext.chunks_exact(block_len).enumerate() {
        plaintext.extend(recover_block(block_idx, block, prev, oracle)?);
        prev = block;
    }

    pkcs7_unpad(&mut plaintext, block_len).map_err(|_| {
        AttackError::InvariantViolation("recovered plaintext has invalid padding".into())
    })?;
    Ok(plaintext)
}

fn recover_block(
    block_idx: usize,
    block: &[u8],
    prev: &[u8],
    oracle: &impl Fn(&[u8], &[u8]) -> bool,
) -> Result<Vec<u8>, AttackError> {
    let block_len = block.len();
    let mut recovered = vec![0u8; block_len];
    for pos in (0..block_len).rev() {
        let pad_len = (block_len - pos) as u8;
        let mut forced = vec![0u8; block_len];
        for j in pos + 1..block_len {
            forced[j] = prev[j] ^ recovered[j] ^ pad_len;
        }

        let mut candidates: Vec<u8> = (0..=255u8)
            .filter(|&guess| {
                forced[..pos].copy_from_slice(&prev[..pos]);
                forced[pos] = prev[pos] ^ guess ^ pad_len;
                oracle(block, &forced)
            })
            .collect();

        // A valid pad of length 1 can be faked by the block's true trailing
        // padding (e.g. an 02 02 tail validates the guess that maps the last
        // byte to 02). Scrambling the penultimate byte breaks every reading
        // except the genuine 01.
        if pad_len == 1 && candidates.len() > 1 {
            candidates.retain(|&guess| {
                forced[..pos].copy_from_slice(&prev[..pos]);
                forced[pos] = prev[pos] ^ guess ^ pad_len;
                forced[pos - 1] ^= 0x01;
                oracle(block, &forced)
            });
        }

        match candidates.as_slice() {
            [byte] => recovered[pos] = *byte,
            [] => {
                return Err(AttackError::InvariantViolation(format!(
                    "no candidate byte validated at block {block_idx}, position {pos}"
                )))
            }
            _ => {
                return Err(AttackError::AmbiguousByte {
                    block: block_idx,
                    candidates,
                })
            }
        }
    }
    Ok(recovered)
}
