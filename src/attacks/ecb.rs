//! Byte-at-a-time recovery of a secret suffix from an ECB encryption oracle,
//! including oracles that prepend an unknown fixed prefix.

use crate::error::AttackError;

const MAX_BLOCK_SIZE_PROBE: usize = 256;

/// Find the oracle's block size by growing the attacker-controlled input
/// until the ciphertext length jumps.
pub fn detect_block_size(oracle: &impl Fn(&[u8]) -> Vec<u8>) -> Result<usize, AttackError> {
    let base_len = oracle(&[]).len();
    for filler_len in 1..=MAX_BLOCK_SIZE_PROBE {
        let len = oracle(&vec![b'A'; filler_len]).len();
        if len > base_len {
            return Ok(len - base_len);
        }
    }
    Err(AttackError::OracleQueryExhausted(format!(
        "ciphertext length did not grow within {MAX_BLOCK_SIZE_PROBE} filler bytes"
    )))
}

/// Length of the fixed prefix the oracle prepends to attacker input.
///
/// Feeds a growing run of constant bytes until a new pair of identical
/// adjacent ciphertext blocks appears. The run is then long enough to fill
/// two whole blocks plus the slack needed to align the prefix, and the
/// position of the new pair pins down the prefix length.
pub fn detect_prefix_len(
    oracle: &impl Fn(&[u8]) -> Vec<u8>,
    block_size: usize,
) -> Result<usize, AttackError> {
    let baseline = duplicate_adjacent_blocks(&oracle(&[]), block_size);
    for filler_len in 2 * block_size..=3 * block_size {
        let ciphertext = oracle(&vec![b'A'; filler_len]);
        if duplicate_adjacent_blocks(&ciphertext, block_size) > baseline {
            let pair_pos = first_duplicate_pair_pos(&ciphertext, block_size)
                .ok_or_else(|| AttackError::InvariantViolation(
                    "duplicate count rose but no adjacent pair found".into(),
                ))?;
            return Ok(pair_pos - (filler_len - 2 * block_size));
        }
    }
    Err(AttackError::OracleQueryExhausted(
        "no duplicate blocks appeared within three blocks of filler".into(),
    ))
}

/// Recover the oracle's secret suffix one byte at a time.
///
/// Detects the block size and prefix length first, then for each suffix
/// position aligns the unknown byte to the end of a block and matches it
/// against all 256 candidate blocks. A position where no candidate matches
/// means recovery has run into the suffix's own padding; the dangling
/// `0x01` padding byte is stripped and the suffix returned.
pub fn recover_ecb_suffix(oracle: &impl Fn(&[u8]) -> Vec<u8>) -> Result<Vec<u8>, AttackError> {
    let block_size = detect_block_size(oracle)?;

    let baseline = duplicate_adjacent_blocks(&oracle(&[]), block_size);
    let probed = duplicate_adjacent_blocks(&oracle(&vec![b'A'; 3 * block_size]), block_size);
    if probed <= baseline {
        return Err(AttackError::InvariantViolation(
            "identical input blocks do not produce identical ciphertext blocks; not ECB".into(),
        ));
    }

    let prefix_len = detect_prefix_len(oracle, block_size)?;
    let align_pad = (block_size - prefix_len % block_size) % block_size;
    let prefix_blocks = (prefix_len + align_pad) / block_size;

    let mut recovered: Vec<u8> = Vec::new();
    loop {
        let filler_len = align_pad + block_size - 1 - recovered.len() % block_size;
        let target_block = prefix_blocks + recovered.len() / block_size;

        let reference = oracle(&vec![b'A'; filler_len]);
        let reference_block = match reference.chunks(block_size).nth(target_block) {
            Some(block) => block.to_vec(),
            None => break,
        };

        let mut probe = vec![b'A'; filler_len];
        probe.extend_from_slice(&recovered);
        let byte = (0..=255u8).find(|&guess| {
            let mut probe = probe.clone();
            probe.push(guess);
            let ciphertext = oracle(&probe);
            ciphertext.chunks(block_size).nth(target_block) == Some(&reference_block[..])
        });
        match byte {
            Some(byte) => recovered.push(byte),
            // No candidate matches once the aligned byte is the suffix's
            // padding, which changes value as the filler shrinks.
            None => break,
        }
    }

    if recovered.last() == Some(&0x01) {
        recovered.pop();
    }
    Ok(recovered)
}

fn duplicate_adjacent_blocks(ciphertext: &[u8], block_size: usize) -> usize {
    ciphertext
        .chunks_exact(block_size)
        .collect::<Vec<_>>()
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .count()
}

fn first_duplicate_pair_pos(ciphertext: &[u8], block_size: usize) -> Option<usize> {
    let blocks: Vec<_> = ciphertext.chunks_exact(block_size).collect();
    blocks
        .windows(2)
        .position(|pair| pair[0] == pair[1])
        .map(|block_idx| block_idx * block_size)
}
