const INITIALISATION_CONSTANTS: [u32; 4] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476];

pub const MD4_LEN: usize = 16;

// Per-round message-word orderings from RFC 1320.
const ROUND_2_ORDER: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];
const ROUND_3_ORDER: [usize; 16] = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];

/// MD4, little-endian sibling of [`crate::sha1::Sha1`], with the same
/// resumable-state constructor.
pub struct Md4 {
    buffer: Vec<u8>,
    state: [u32; 4],
    message_bit_len: u64,
}

impl Md4 {
    pub fn new() -> Self {
        Self::from_state(INITIALISATION_CONSTANTS, 0)
    }

    pub fn from_state(state: [u32; 4], message_bit_len: u64) -> Self {
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

    pub fn digest(mut self) -> [u8; MD4_LEN] {
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.push(0x80);
        let zeros = (64 - (buffer.len() + 8) % 64) % 64;
        buffer.extend(std::iter::repeat(0x00).take(zeros));
        buffer.extend_from_slice(&self.message_bit_len.to_le_bytes());

        for chunk in buffer.chunks_exact(64) {
            self.process_chunk(chunk.try_into().unwrap());
        }

        self.state
            .map(u32::to_le_bytes)
            .concat()
            .try_into()
            .unwrap()
    }

    pub fn digest_message(message: &[u8]) -> [u8; MD4_LEN] {
        let mut hasher = Self::new();
        hasher.update(message);
        hasher.digest()
    }

    fn process_chunk(&mut self, chunk: &[u8; 64]) {
        let x: [u32; 16] = std::array::from_fn(|i| {
            u32::from_le_bytes(chunk[4 * i..4 * i + 4].try_into().unwrap())
        });

        let [mut a, mut b, mut c, mut d] = self.state;

        let shifts = [3, 7, 11, 19];
        for i in 0..16 {
            let sum = f(b, c, d).wrapping_add(x[i]);
            (a, b, c, d) = (d, a.wrapping_add(sum).rotate_left(shifts[i % 4]), b, c);
        }

        let shifts = [3, 5, 9, 13];
        for i in 0..16 {
            let sum = g(b, c, d)
                .wrapping_add(x[ROUND_2_ORDER[i]])
                .wrapping_add(0x5A827999);
            (a, b, c, d) = (d, a.wrapping_add(sum).rotate_left(shifts[i % 4]), b, c);
        }

        let shifts = [3, 9, 11, 15];
        for i in 0..16 {
            let sum = h(b, c, d)
                .wrapping_add(x[ROUND_3_ORDER[i]])
                .wrapping_add(0x6ED9EBA1);
            (a, b, c, d) = (d, a.wrapping_add(sum).rotate_left(shifts[i % 4]), b, c);
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }
}

impl Default for Md4 {
    fn default() -> Self {
        Self::new()
    }
}

fn f(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

fn g(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

fn h(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}
