// AES-128 block primitive. Deliberately simple and not constant-time; it
// exists so the attacks have a victim cipher to break.

#[rustfmt::skip]
const S_BOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[rustfmt::skip]
const INV_S_BOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

const ROUND_CONSTANTS: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36];

const MIX_MATRIX: [u8; 16] = [2, 3, 1, 1, 1, 2, 3, 1, 1, 1, 2, 3, 3, 1, 1, 2];
#[rustfmt::skip]
const INV_MIX_MATRIX: [u8; 16] = [
    14, 11, 13,  9,
     9, 14, 11, 13,
    13,  9, 14, 11,
    11, 13,  9, 14,
];

pub struct AesCipher {
    round_keys: [[u8; 16]; 11],
}

impl AesCipher {
    pub fn new(key: &[u8; 16]) -> Self {
        Self {
            round_keys: expand_key(key),
        }
    }

    pub fn encrypt_block(&self, block: &[u8; 16]) -> [u8; 16] {
        let mut state = *block;
        add_round_key(&mut state, &self.round_keys[0]);
        for round_key in &self.round_keys[1..10] {
            substitute_bytes(&mut state, &S_BOX);
            shift_rows(&mut state);
            mix_columns(&mut state, &MIX_MATRIX);
            add_round_key(&mut state, round_key);
        }
        // No mix stage in the final round.
        substitute_bytes(&mut state, &S_BOX);
        shift_rows(&mut state);
        add_round_key(&mut state, &self.round_keys[10]);
        state
    }

    pub fn decrypt_block(&self, block: &[u8; 16]) -> [u8; 16] {
        let mut state = *block;
        add_round_key(&mut state, &self.round_keys[10]);
        for round_key in self.round_keys[1..10].iter().rev() {
            inv_shift_rows(&mut state);
            substitute_bytes(&mut state, &INV_S_BOX);
            add_round_key(&mut state, round_key);
            mix_columns(&mut state, &INV_MIX_MATRIX);
        }
        inv_shift_rows(&mut state);
        substitute_bytes(&mut state, &INV_S_BOX);
        add_round_key(&mut state, &self.round_keys[0]);
        state
    }
}

// State layout: byte i of a block is state[i], giving row i % 4 and
// column i / 4 of the AES state matrix.
fn add_round_key(state: &mut [u8; 16], round_key: &[u8; 16]) {
    for (b, k) in state.iter_mut().zip(round_key) {
        *b ^= k;
    }
}

fn substitute_bytes(state: &mut [u8; 16], table: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = table[*b as usize];
    }
}

fn shift_rows(state: &mut [u8; 16]) {
    for row in 1..4 {
        let old = [state[row], state[row + 4], state[row + 8], state[row + 12]];
        for col in 0..4 {
            state[row + 4 * col] = old[(col + row) % 4];
        }
    }
}

fn inv_shift_rows(state: &mut [u8; 16]) {
    for row in 1..4 {
        let old = [state[row], state[row + 4], state[row + 8], state[row + 12]];
        for col in 0..4 {
            state[row + 4 * col] = old[(col + 4 - row) % 4];
        }
    }
}

fn mix_columns(state: &mut [u8; 16], matrix: &[u8; 16]) {
    for col in 0..4 {
        let column: [u8; 4] = state[4 * col..4 * col + 4].try_into().unwrap();
        for row in 0..4 {
            state[4 * col + row] = (0..4)
                .map(|k| galois_multiply(matrix[4 * row + k], column[k]))
                .fold(0, |acc, x| acc ^ x);
        }
    }
}

fn galois_multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0;
    for _ in 0..8 {
        if b & 1 > 0 {
            product ^= a;
        }
        let carry = a & 0x80;
        a <<= 1;
        if carry > 0 {
            a ^= 0x1B;
        }
        b >>= 1;
    }
    product
}

fn expand_key(key: &[u8; 16]) -> [[u8; 16]; 11] {
    let mut words = [0u32; 44];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        words[i] = u32::from_be_bytes(chunk.try_into().unwrap());
    }
    for i in 4..44 {
        let mut temp = words[i - 1];
        if i % 4 == 0 {
            temp = substitute_word(temp.rotate_left(8))
                ^ (u32::from(ROUND_CONSTANTS[i / 4 - 1]) << 24);
        }
        words[i] = words[i - 4] ^ temp;
    }

    let mut round_keys = [[0u8; 16]; 11];
    for (round, round_key) in round_keys.iter_mut().enumerate() {
        for col in 0..4 {
            round_key[4 * col..4 * col + 4].copy_from_slice(&words[4 * round + col].to_be_bytes());
        }
    }
    round_keys
}

fn substitute_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(|b| S_BOX[b as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0x02, 0x63, 0b11000110)]
    #[case(0x03, 0x2F, 0b01110001)]
    #[case(0x01, 0xAF, 0xAF)]
    fn galois_multiply_matches_known_products(#[case] a: u8, #[case] b: u8, #[case] expected: u8) {
        assert_eq!(galois_multiply(a, b), expected);
    }

    #[test]
    fn expand_key_generates_known_round_keys() {
        let key = *b"Thats my Kung Fu";

        let round_keys = expand_key(&key);

        assert_eq!(round_keys[0], key);
        assert_eq!(
            round_keys[1],
            [
                0xE2, 0x32, 0xFC, 0xF1, 0x91, 0x12, 0x91, 0x88, 0xB1, 0x59, 0xE4, 0xE6, 0xD6, 0x79,
                0xA2, 0x93
            ]
        );
        assert_eq!(
            round_keys[10],
            [
                0x28, 0xFD, 0xDE, 0xF8, 0x6D, 0xA4, 0x24, 0x4A, 0xCC, 0xC0, 0xA4, 0xFE, 0x3B, 0x31,
                0x6F, 0x26
            ]
        );
    }

    #[test]
    fn encrypt_block_matches_known_answer() {
        let cipher = AesCipher::new(b"Thats my Kung Fu");

        let ciphertext = cipher.encrypt_block(b"Two One Nine Two");

        let expected = [
            0x29, 0xC3, 0x50, 0x5F, 0x57, 0x14, 0x20, 0xF6, 0x40, 0x22, 0x99, 0xB3, 0x1A, 0x02,
            0xD7, 0x3A,
        ];
        assert_eq!(ciphertext, expected);
    }

    #[test]
    fn decrypt_block_inverts_encrypt_block() {
        let cipher = AesCipher::new(b"YELLOW SUBMARINE");
        let plaintext = *b"attack at dawn!!";

        let roundtrip = cipher.decrypt_block(&cipher.encrypt_block(&plaintext));

        assert_eq!(roundtrip, plaintext);
    }
}
