/// Integer tuple codec.
///
/// A message is a short sequence of integers in `0..=65535`. Each integer is
/// carried as exactly one unit of the frame: one UTF-16 code unit in a text
/// frame, or one big-endian `u16` in a binary frame. There is no length
/// prefix and no escaping.
use thiserror::Error;

/// Errors raised while turning frames into integers or back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A character outside the BMP needs two UTF-16 units and so cannot stand for one value.
    #[error("character U+{code_point:X} at index {index} spans more than one code unit")]
    MultiUnit { index: usize, code_point: u32 },
    /// Surrogate values have no valid text representation.
    #[error("value {0} cannot be carried in a text frame")]
    Unrepresentable(u16),
    #[error("binary frame length {0} is not a multiple of two")]
    OddLength(usize),
}

/// Frame flavour a client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Text,
    Binary,
}

/// An encoded frame ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl WireFormat {
    pub fn encode(self, values: &[u16]) -> Result<Frame, CodecError> {
        match self {
            WireFormat::Text => encode_text(values).map(Frame::Text),
            WireFormat::Binary => Ok(Frame::Binary(encode_binary(values))),
        }
    }
}

/// Encode values as a text frame, one character per value.
pub fn encode_text(values: &[u16]) -> Result<String, CodecError> {
    values
        .iter()
        .map(|&v| char::from_u32(u32::from(v)).ok_or(CodecError::Unrepresentable(v)))
        .collect()
}

/// Decode a text frame back into its values.
pub fn decode_text(text: &str) -> Result<Vec<u16>, CodecError> {
    text.chars()
        .enumerate()
        .map(|(index, c)| {
            u16::try_from(u32::from(c)).map_err(|_| CodecError::MultiUnit {
                index,
                code_point: u32::from(c),
            })
        })
        .collect()
}

pub fn encode_binary(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn decode_binary(bytes: &[u8]) -> Result<Vec<u16>, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let values = vec![202, 100, 50, 31416, 5, 0, 65535];
        let text = encode_text(&values).unwrap();
        assert_eq!(text.chars().count(), values.len());
        assert_eq!(decode_text(&text).unwrap(), values);
    }

    #[test]
    fn test_text_matches_utf16_units() {
        let text = encode_text(&[101, 542]).unwrap();
        assert_eq!(text.encode_utf16().collect::<Vec<_>>(), vec![101, 542]);
    }

    #[test]
    fn test_text_rejects_surrogates() {
        assert_eq!(encode_text(&[202, 0xD800]), Err(CodecError::Unrepresentable(0xD800)));
    }

    #[test]
    fn test_text_rejects_multi_unit_characters() {
        let err = decode_text("\u{65}\u{1F3D3}").unwrap_err();
        assert_eq!(err, CodecError::MultiUnit { index: 1, code_point: 0x1F3D3 });
    }

    #[test]
    fn test_empty_frames() {
        assert_eq!(encode_text(&[]).unwrap(), "");
        assert!(decode_text("").unwrap().is_empty());
        assert!(decode_binary(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_binary_round_trip_covers_surrogates() {
        let values = vec![202, 0xD800, 0xDFFF, 62831, 65535];
        let bytes = encode_binary(&values);
        assert_eq!(bytes.len(), values.len() * 2);
        assert_eq!(decode_binary(&bytes).unwrap(), values);
    }

    #[test]
    fn test_binary_is_big_endian() {
        assert_eq!(encode_binary(&[0x0102]), vec![0x01, 0x02]);
    }

    #[test]
    fn test_binary_rejects_odd_length() {
        assert_eq!(decode_binary(&[0, 201, 1]), Err(CodecError::OddLength(3)));
    }

    #[test]
    fn test_wire_format_encode() {
        assert_eq!(WireFormat::Text.encode(&[102]).unwrap(), Frame::Text("\u{66}".to_string()));
        assert_eq!(WireFormat::Binary.encode(&[102]).unwrap(), Frame::Binary(vec![0, 102]));
        assert!(WireFormat::Text.encode(&[0xDC00]).is_err());
        assert!(WireFormat::Binary.encode(&[0xDC00]).is_ok());
    }
}
