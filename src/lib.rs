mod aes;
mod attacks;
mod dsa;
mod english;
mod error;
mod md4;
mod modes;
mod mt19937;
mod pkcs7;
mod prime;
mod rsa;
mod sha1;
mod xor;

pub use aes::AesCipher;
pub use attacks::cbc::{cbc_padding_oracle_attack, flip_cbc_plaintext};
pub use attacks::ctr::recover_ctr_plaintext_via_edit;
pub use attacks::dsa::{
    recover_key_from_bounded_nonce, recover_key_from_known_nonce, recover_key_from_nonce_reuse,
    SignedMessage,
};
pub use attacks::ecb::{detect_block_size, detect_prefix_len, recover_ecb_suffix};
pub use attacks::mac::{
    forge_mac, glue_padding, length_extension_attack, Forgery, HashKind, KeyedMacOracle,
};
pub use attacks::prng::{
    clone_from_outputs, clone_generator, mt19937_stream_cipher, recover_stream_seed,
    recover_timestamp_seed, untemper,
};
pub use attacks::rsa::{bleichenbacher_attack, bleichenbacher_attack_with_budget};
pub use dsa::{
    generate_dsa_key_pair, hash_message, sign, sign_with_nonce, verify, DsaKeyPair, DsaParameters,
    DsaSignature,
};
pub use english::{brute_force_byte_xor_cipher, score_english_by_frequency, XorCrackResult};
pub use error::AttackError;
pub use md4::{Md4, MD4_LEN};
pub use modes::{
    aes_128_ctr, decrypt_aes_128_cbc, decrypt_aes_128_ecb, edit_aes_128_ctr, encrypt_aes_128_cbc,
    encrypt_aes_128_ecb, BLOCK_SIZE,
};
pub use mt19937::{Mt19937, MT19937_STATE_LEN};
pub use pkcs7::{pkcs7_pad, pkcs7_unpad, InvalidPadding};
pub use prime::{generate_prime, is_likely_prime};
pub use rsa::{
    generate_rsa_key_pair, pkcs1v15_pad, pkcs1v15_strip, rsa_apply, to_fixed_bytes_be, RsaKeyPair,
};
pub use sha1::{Sha1, SHA1_LEN};
pub use xor::{xor_slices, xor_with_key};
