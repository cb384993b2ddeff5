// Block-cipher modes over the AES-128 primitive. These are the victim-side
// constructions the oracle attacks tear apart.
use crate::aes::AesCipher;
use crate::pkcs7::{pkcs7_pad, pkcs7_unpad, InvalidPadding};
use crate::xor::xor_slices;

pub const BLOCK_SIZE: usize = 16;

pub fn encrypt_aes_128_ecb(message: &[u8], key: &[u8; 16]) -> Vec<u8> {
    let cipher = AesCipher::new(key);
    let mut padded = message.to_vec();
    pkcs7_pad(&mut padded, BLOCK_SIZE);

    let mut ciphertext = Vec::with_capacity(padded.len());
    for block in padded.chunks_exact(BLOCK_SIZE) {
        ciphertext.extend_from_slice(&cipher.encrypt_block(block.try_into().unwrap()));
    }
    ciphertext
}

pub fn decrypt_aes_128_ecb(ciphertext: &[u8], key: &[u8; 16]) -> Result<Vec<u8>, InvalidPadding> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(InvalidPadding);
    }
    let cipher = AesCipher::new(key);
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for block in ciphertext.chunks_exact(BLOCK_SIZE) {
        plaintext.extend_from_slice(&cipher.decrypt_block(block.try_into().unwrap()));
    }
    pkcs7_unpad(&mut plaintext, BLOCK_SIZE)?;
    Ok(plaintext)
}

pub fn encrypt_aes_128_cbc(message: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Vec<u8> {
    let cipher = AesCipher::new(key);
    let mut padded = message.to_vec();
    pkcs7_pad(&mut padded, BLOCK_SIZE);

    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut chain = *iv;
    for block in padded.chunks_exact(BLOCK_SIZE) {
        let mixed = xor_slices(block, &chain);
        chain = cipher.encrypt_block(&mixed.try_into().unwrap());
        ciphertext.extend_from_slice(&chain);
    }
    ciphertext
}

pub fn decrypt_aes_128_cbc(
    ciphertext: &[u8],
    key: &[u8; 16],
    iv: &[u8; 16],
) -> Result<Vec<u8>, InvalidPadding> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(InvalidPadding);
    }
    let cipher = AesCipher::new(key);
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut chain: [u8; 16] = *iv;
    for block in ciphertext.chunks_exact(BLOCK_SIZE) {
        let block: [u8; 16] = block.try_into().unwrap();
        plaintext.extend_from_slice(&xor_slices(&cipher.decrypt_block(&block), &chain));
        chain = block;
    }
    pkcs7_unpad(&mut plaintext, BLOCK_SIZE)?;
    Ok(plaintext)
}

/// AES-128 in CTR mode. Encryption and decryption are the same operation.
pub fn aes_128_ctr(message: &[u8], key: &[u8; 16], nonce: &[u8; 8], initial_value: u64) -> Vec<u8> {
    let cipher = AesCipher::new(key);
    let mut output = Vec::with_capacity(message.len());
    let mut counter = initial_value;
    let mut ctr_block = [0u8; 16];
    ctr_block[..8].copy_from_slice(nonce);
    for message_block in message.chunks(BLOCK_SIZE) {
        ctr_block[8..].copy_from_slice(&counter.to_le_bytes());
        let key_stream = cipher.encrypt_block(&ctr_block);
        output.extend(message_block.iter().zip(key_stream).map(|(m, k)| m ^ k));
        counter += 1;
    }
    output
}

/// Re-encrypt `new_text` into a CTR ciphertext at `offset`, reusing the
/// keystream for that position. This "seekable" edit is exactly the
/// capability the CTR edit-oracle attack exploits.
pub fn edit_aes_128_ctr(
    ciphertext: &mut [u8],
    key: &[u8; 16],
    offset: usize,
    new_text: &[u8],
    nonce: &[u8; 8],
) {
    if new_text.is_empty() || offset >= ciphertext.len() {
        return;
    }
    let end = (offset + new_text.len()).min(ciphertext.len());
    let new_text = &new_text[..end - offset];

    let cipher = AesCipher::new(key);
    let first_block = offset / BLOCK_SIZE;
    let last_block = (end - 1) / BLOCK_SIZE;
    let mut ctr_block = [0u8; 16];
    ctr_block[..8].copy_from_slice(nonce);

    let mut key_stream = Vec::with_capacity((last_block - first_block + 1) * BLOCK_SIZE);
    for counter in first_block..=last_block {
        ctr_block[8..].copy_from_slice(&(counter as u64).to_le_bytes());
        key_stream.extend_from_slice(&cipher.encrypt_block(&ctr_block));
    }

    let skip = offset % BLOCK_SIZE;
    for (i, (byte, k)) in new_text.iter().zip(&key_stream[skip..]).enumerate() {
        ciphertext[offset + i] = byte ^ k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    #[test]
    fn ecb_roundtrip_restores_message() {
        let key = b"YELLOW SUBMARINE";
        let message = b"You thought that I was weak, Boy, you're sadly mistaken";

        let ciphertext = encrypt_aes_128_ecb(message, key);
        let plaintext = decrypt_aes_128_ecb(&ciphertext, key).unwrap();

        assert_eq!(plaintext, message);
    }

    #[test]
    fn ecb_maps_identical_blocks_to_identical_ciphertext() {
        let ciphertext = encrypt_aes_128_ecb(&[b'A'; 32], b"YELLOW SUBMARINE");

        assert_eq!(ciphertext[..16], ciphertext[16..32]);
    }

    #[test]
    fn cbc_roundtrip_restores_message() {
        let key = b"YELLOW SUBMARINE";
        let iv = [7u8; 16];
        let message = b"In the quiet, in the crowd";

        let ciphertext = encrypt_aes_128_cbc(message, key, &iv);
        let plaintext = decrypt_aes_128_cbc(&ciphertext, key, &iv).unwrap();

        assert_eq!(plaintext, message);
    }

    #[test]
    fn ecb_decryption_rejects_misaligned_ciphertext() {
        let key = b"YELLOW SUBMARINE";
        let ciphertext = encrypt_aes_128_ecb(b"funky music", key);

        assert!(decrypt_aes_128_ecb(&ciphertext[..ciphertext.len() - 1], key).is_err());
    }

    #[test]
    fn cbc_decryption_rejects_misaligned_ciphertext() {
        let key = b"YELLOW SUBMARINE";
        let iv = [0u8; 16];
        let ciphertext = encrypt_aes_128_cbc(b"funky music", key, &iv);

        assert!(decrypt_aes_128_cbc(&ciphertext[..7], key, &iv).is_err());
    }

    #[test]
    fn cbc_decryption_rejects_tampered_final_block() {
        let key = b"YELLOW SUBMARINE";
        let iv = [0u8; 16];
        let mut ciphertext = encrypt_aes_128_cbc(b"sixteen byte msg", key, &iv);
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xa5;

        assert!(decrypt_aes_128_cbc(&ciphertext, key, &iv).is_err());
    }

    #[test]
    fn ctr_encrypts_to_expected_ciphertext() {
        let message = b"Yo, VIP Let's kick it Ice, Ice, baby Ice, Ice, baby ";

        let ciphertext = aes_128_ctr(message, b"YELLOW SUBMARINE", &[0u8; 8], 0);

        let expected =
            "L77na/nrFsKvynd6HzOoG7GHTLXsTVu9qvY/2syLXzhPweyyMTJULu/6/kXX0KSvoOLSFQ==";
        assert_eq!(BASE64.encode(&ciphertext), expected);
    }

    #[test]
    fn ctr_edit_rewrites_a_span_in_place() {
        let key = b"YELLOW SUBMARINE";
        let nonce = [3u8; 8];
        let plaintext = vec![0u8; 37];
        let mut ciphertext = aes_128_ctr(&plaintext, key, &nonce, 0);

        edit_aes_128_ctr(&mut ciphertext, key, 13, &[b'A'; 21], &nonce);

        let edited = aes_128_ctr(&ciphertext, key, &nonce, 0);
        assert_eq!(
            edited,
            [vec![0u8; 13], vec![b'A'; 21], vec![0u8; 3]].concat()
        );
    }
}
