use std::fmt;

/// Returned when a buffer does not end in well-formed PKCS#7 padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPadding;

impl fmt::Display for InvalidPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid PKCS#7 padding")
    }
}

impl std::error::Error for InvalidPadding {}

/// Append PKCS#7 padding in place. A full extra block is added when the
/// input length is already a multiple of the block length.
pub fn pkcs7_pad(data: &mut Vec<u8>, block_len: usize) {
    let pad_len = block_len - (data.len() % block_len);
    data.extend(std::iter::repeat(pad_len as u8).take(pad_len));
}

/// Validate and strip PKCS#7 padding in place.
pub fn pkcs7_unpad(data: &mut Vec<u8>, block_len: usize) -> Result<(), InvalidPadding> {
    let &last = data.last().ok_or(InvalidPadding)?;
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > block_len || pad_len > data.len() {
        return Err(InvalidPadding);
    }
    if data[data.len() - pad_len..].iter().any(|&b| b != last) {
        return Err(InvalidPadding);
    }
    data.truncate(data.len() - pad_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn pkcs7_pad_extends_to_block_boundary() {
        let mut data = b"YELLOW SUBMARINE".to_vec();

        pkcs7_pad(&mut data, 20);

        assert_eq!(data, b"YELLOW SUBMARINE\x04\x04\x04\x04");
    }

    #[test]
    fn pkcs7_pad_adds_full_block_for_aligned_input() {
        let mut data = b"0123456789abcdef".to_vec();

        pkcs7_pad(&mut data, 16);

        assert_eq!(data.len(), 32);
        assert_eq!(&data[16..], &[16u8; 16]);
    }

    #[test]
    fn pkcs7_unpad_strips_valid_padding() {
        let mut data = b"ICE ICE BABY\x04\x04\x04\x04".to_vec();

        pkcs7_unpad(&mut data, 16).unwrap();

        assert_eq!(data, b"ICE ICE BABY");
    }

    #[rstest]
    #[case(b"ICE ICE BABY\x05\x05\x05\x05".to_vec())]
    #[case(b"ICE ICE BABY\x01\x02\x03\x04".to_vec())]
    #[case(b"ICE ICE BABY\x00".to_vec())]
    #[case(b"\x11".repeat(17))]
    fn pkcs7_unpad_rejects_malformed_padding(#[case] mut data: Vec<u8>) {
        assert_eq!(pkcs7_unpad(&mut data, 16), Err(InvalidPadding));
    }
}
