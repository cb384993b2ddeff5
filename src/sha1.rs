const INITIALISATION_CONSTANTS: [u32; 5] =
    [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

pub const SHA1_LEN: usize = 20;

/// SHA-1 with a constructor that resumes from an arbitrary chaining state,
/// which is all a length-extension attacker needs.
pub struct Sha1 {
    buffer: Vec<u8>,
    state: [u32; 5],
    message_bit_len: u64,
}

impl Sha1 {
    pub fn new() -> Self {
        Self::from_state(INITIALISATION_CONSTANTS, 0)
    }

    /// Start from a known chaining value. `message_bit_len` is the total bit
    /// length that will be encoded in the final length field, covering
    /// everything already absorbed into `state` plus what `update` adds.
    pub fn from_state(state: [u32; 5], message_bit_len: u64) -> Self {
        Self {
            buffer: Vec::new(),
            state,
            message_bit_len,
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        self.message_bit_len += 8 * bytes.len() as u64;
    }

    pub fn digest(mut self) -> [u8; SHA1_LEN] {
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.push(0x80);
        let zeros = (64 - (buffer.len() + 8) % 64) % 64;
        buffer.extend(std::iter::repeat(0x00).take(zeros));
        buffer.extend_from_slice(&self.message_bit_len.to_be_bytes());

        for chunk in buffer.chunks_exact(64) {
            self.process_chunk(chunk.try_into().unwrap());
        }

        self.state
            .map(u32::to_be_bytes)
            .concat()
            .try_into()
            .unwrap()
    }

    pub fn digest_message(message: &[u8]) -> [u8; SHA1_LEN] {
        let mut hasher = Self::new();
        hasher.update(message);
        hasher.digest()
    }

    fn process_chunk(&mut self, chunk: &[u8; 64]) {
        let mut w = [0u32; 80];
        for (i, word) in chunk.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes(word.try_into().unwrap());
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.state;
        for (i, &word) in w.iter().enumerate() {
            let (f, k) = match i {
                0..=19 => ((b & c) | ((!b) & d), 0x5A827999),
                20..=39 => (b ^ c ^ d, 0x6ED9EBA1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1BBCDC),
                _ => (b ^ c ^ d, 0xCA62C1D6),
            };

            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(word);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
        self.state[4] = self.state[4].wrapping_add(e);
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("", "da39a3ee5e6b4b0d3255bfef95601890afd80709")]
    #[case("abc", "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case(
        "We all live in a yellow submarine.",
        "ec4755c1d35930593852add3cf89e69eec5fac8d"
    )]
    fn digest_returns_expected_hash(#[case] input: &str, #[case] expected: &str) {
        let digest = Sha1::digest_message(input.as_bytes());

        assert_eq!(hex::encode(digest), expected);
    }

    #[test]
    fn digest_handles_inputs_spanning_multiple_chunks() {
        let digest = Sha1::digest_message(&[b'a'; 1_000_000]);

        assert_eq!(
            hex::encode(digest),
            "34aa973cd4c4daa4f61eeb2bdbad27316534016f"
        );
    }
}
