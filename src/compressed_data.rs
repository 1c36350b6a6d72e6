use std::io::{self, Cursor, Read, Write};

use crate::config::Framing;
use crate::error::{Error, Result};

/// Serialized code tree plus the packed bitstream it decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub tree: String,
    pub payload: Vec<u8>,
}

impl CompressedData {
    pub fn serialize(&self, framing: Framing) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.tree.len() + self.payload.len() + 16);
        match framing {
            Framing::LengthPrefixed => {
                // write the tree length, then tree text
                let tree_len = self.tree.len() as u64;
                bytes.write_all(&tree_len.to_le_bytes())?;
                bytes.write_all(self.tree.as_bytes())?;

                // write payload length, then payload
                let payload_len = self.payload.len() as u64;
                bytes.write_all(&payload_len.to_le_bytes())?;
                bytes.write_all(&self.payload)?;
            },
            Framing::Line => {
                bytes.write_all(self.tree.as_bytes())?;
                bytes.write_all(b"\n")?;
                bytes.write_all(&self.payload)?;
            }
        }
        Ok(bytes)
    }

    pub fn deserialize(data: &[u8], framing: Framing) -> Result<CompressedData> {
        match framing {
            Framing::LengthPrefixed => Self::read_length_prefixed(data),
            Framing::Line => Self::read_line(data),
        }
    }

    fn read_length_prefixed(data: &[u8]) -> Result<CompressedData> {
        let mut cursor = Cursor::new(data);

        let tree_len = read_length(&mut cursor, "tree length")?;
        let tree_data = read_section(&mut cursor, tree_len, "tree")?;

        let payload_len = read_length(&mut cursor, "payload length")?;
        let payload = read_section(&mut cursor, payload_len, "payload")?;

        if cursor.position() as usize != data.len() {
            return Err(Error::container(format!(
                "{} trailing bytes after payload",
                data.len() - cursor.position() as usize
            )));
        }

        Ok(CompressedData {
            tree: tree_text(tree_data)?,
            payload,
        })
    }

    /// Splits at the first newline only; the payload is taken byte-exact, so
    /// newline bytes inside it survive.
    fn read_line(data: &[u8]) -> Result<CompressedData> {
        let split = data.iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| Error::container("missing newline after tree line"))?;

        Ok(CompressedData {
            tree: tree_text(data[..split].to_vec())?,
            payload: data[split + 1..].to_vec(),
        })
    }
}

fn read_length(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<usize> {
    let mut length_bytes = [0u8; 8];
    cursor.read_exact(&mut length_bytes)
        .map_err(|_| Error::container(format!("truncated {}", what)))?;
    usize::try_from(u64::from_le_bytes(length_bytes))
        .map_err(|_| Error::container(format!("{} out of range", what)))
}

fn read_section(cursor: &mut Cursor<&[u8]>, len: usize, what: &str) -> Result<Vec<u8>> {
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(Error::container(format!(
            "{} needs {} bytes, {} remain",
            what, len, remaining
        )));
    }
    let mut section = vec![0u8; len];
    cursor.read_exact(&mut section)?;
    Ok(section)
}

fn tree_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::container("tree text is not valid UTF-8"))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> CompressedData {
        CompressedData {
            tree: "1(0.75:61,0.25:0a)".to_string(),
            // payload deliberately contains newline bytes
            payload: vec![0x0a, 0x00, 0x0a, 0xff, 0x05],
        }
    }

    #[test]
    fn length_prefixed_layout() {
        let bytes = sample().serialize(Framing::LengthPrefixed).unwrap();
        assert_eq!(&bytes[..8], &18u64.to_le_bytes());
        assert_eq!(&bytes[8..26], b"1(0.75:61,0.25:0a)");
        assert_eq!(&bytes[26..34], &5u64.to_le_bytes());
        assert_eq!(&bytes[34..], &[0x0a, 0x00, 0x0a, 0xff, 0x05]);

        let back = CompressedData::deserialize(&bytes, Framing::LengthPrefixed).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn line_framing_keeps_payload_newlines() {
        let bytes = sample().serialize(Framing::Line).unwrap();
        assert_eq!(&bytes[..19], b"1(0.75:61,0.25:0a)\n");

        let back = CompressedData::deserialize(&bytes, Framing::Line).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn truncated_length_prefixed() {
        let bytes = sample().serialize(Framing::LengthPrefixed).unwrap();
        for cut in [0, 4, 8, 20, 30, bytes.len() - 1] {
            let result = CompressedData::deserialize(&bytes[..cut], Framing::LengthPrefixed);
            assert!(matches!(result, Err(Error::Container { .. })), "cut at {}", cut);
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample().serialize(Framing::LengthPrefixed).unwrap();
        bytes.push(0);
        let result = CompressedData::deserialize(&bytes, Framing::LengthPrefixed);
        assert!(matches!(result, Err(Error::Container { .. })));
    }

    #[test]
    fn line_framing_requires_newline() {
        let result = CompressedData::deserialize(b"1:61", Framing::Line);
        assert!(matches!(result, Err(Error::Container { .. })));
    }
}
