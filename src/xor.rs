/// XOR two equal-length byte slices.
///
/// Panics if the slices differ in length; every caller in this crate
/// constructs both sides to the same size.
pub fn xor_slices(a: &[u8], b: &[u8]) -> Vec<u8> {
    assert_eq!(a.len(), b.len(), "xor_slices requires equal-length inputs");
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// XOR every byte with a single-byte key.
pub fn xor_with_key(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_slices_combines_equal_length_buffers() {
        let a = hex::decode("1c0111001f010100061a024b53535009181c").unwrap();
        let b = hex::decode("686974207468652062756c6c277320657965").unwrap();

        let expected = hex::decode("746865206b696420646f6e277420706c6179").unwrap();
        assert_eq!(xor_slices(&a, &b), expected);
    }

    #[test]
    fn xor_with_key_is_an_involution() {
        let message = b"light attracts bugs";

        assert_eq!(xor_with_key(&xor_with_key(message, 0x3f), 0x3f), message);
    }
}
