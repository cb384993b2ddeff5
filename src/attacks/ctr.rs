//! Plaintext recovery from a "seekable" CTR edit oracle.

use crate::xor::xor_slices;

/// Recover the plaintext behind a CTR ciphertext given an oracle that
/// re-encrypts attacker text at an arbitrary offset.
///
/// Editing zero bytes over the whole message makes the returned ciphertext
/// the raw keystream, which decrypts the original ciphertext directly.
pub fn recover_ctr_plaintext_via_edit(
    ciphertext: &[u8],
    edit: &impl Fn(usize, &[u8]) -> Vec<u8>,
) -> Vec<u8> {
    let key_stream = edit(0, &vec![0u8; ciphertext.len()]);
    xor_slices(ciphertext, &key_stream[..ciphertext.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::modes::{aes_128_ctr, edit_aes_128_ctr};

    #[test]
    fn edit_oracle_leaks_full_plaintext() {
        let key = *b"random disk key!";
        let nonce = [0x07; 8];
        let plaintext: Vec<u8> = (0..200).map(|i| (i * 31 + 5) as u8).collect();
        let ciphertext = aes_128_ctr(&plaintext, &key, &nonce, 0);

        let edit = |offset: usize, new_text: &[u8]| {
            let mut edited = ciphertext.clone();
            edit_aes_128_ctr(&mut edited, &key, offset, new_text, &nonce);
            edited
        };
        let recovered = recover_ctr_plaintext_via_edit(&ciphertext, &edit);

        assert_eq!(recovered, plaintext);
    }
}
