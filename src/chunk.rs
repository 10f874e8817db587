//! The raw IFF chunk walker.
//!
//! An IFF file is a single `FORM` chunk: {`"FORM"`, u32 big-endian size,
//! 4-byte form type tag, sub-chunks}. Each sub-chunk is {4-byte tag, u32
//! big-endian length, `length` bytes of payload, an optional zero pad byte
//! to keep the stream word-aligned}. This mirrors the shape of
//! `imagine::RawPngChunkIter`, just with IFF's big-endian lengths and
//! optional (rather than mandatory) pad byte.

use crate::error::IffError;
use crate::reader::u32_be;

/// One sub-chunk as found directly in the byte stream, with no
/// interpretation of its tag or payload.
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'b> {
  pub tag: [u8; 4],
  pub data: &'b [u8],
}

/// The body of a `FORM` container: its 4-character type tag, plus an
/// iterator over the sub-chunks that follow.
pub struct FormFile<'b> {
  pub form_type: [u8; 4],
  body: &'b [u8],
}
impl<'b> FormFile<'b> {
  /// Parses the outer `FORM` wrapper and returns the form type plus a
  /// cursor ready to iterate sub-chunks.
  pub fn new(bytes: &'b [u8]) -> Result<Self, IffError> {
    let (tag, rest) = split_at_checked(bytes, 4).ok_or(IffError::NotAForm)?;
    if tag != b"FORM" {
      return Err(IffError::NotAForm);
    }
    let (len_bytes, rest) = split_at_checked(rest, 4).ok_or(IffError::TruncatedChunkHeader)?;
    let declared_len = u32_be(len_bytes) as usize;
    let (form_type_bytes, body) = split_at_checked(rest, 4).ok_or(IffError::TruncatedChunkHeader)?;
    let form_type: [u8; 4] = form_type_bytes.try_into().unwrap();
    // declared_len counts the form type tag plus every sub-chunk; tolerate
    // a file that's longer than declared (trailing garbage) but not one
    // that's shorter (truncated).
    if body.len() + 4 < declared_len {
      return Err(IffError::TruncatedChunkPayload);
    }
    Ok(Self { form_type, body })
  }

  /// An iterator over this FORM's sub-chunks, in file order.
  #[inline]
  pub fn chunks(&self) -> ChunkIter<'b> {
    ChunkIter { bytes: self.body }
  }
}

/// Iterates the sub-chunks of a FORM body, one [`RawChunk`] at a time.
#[derive(Clone)]
pub struct ChunkIter<'b> {
  bytes: &'b [u8],
}
impl<'b> Iterator for ChunkIter<'b> {
  type Item = Result<RawChunk<'b>, IffError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.bytes.is_empty() {
      return None;
    }
    let (tag_bytes, rest) = match split_at_checked(self.bytes, 4) {
      Some(x) => x,
      None => {
        self.bytes = &[];
        return Some(Err(IffError::TruncatedChunkHeader));
      }
    };
    let (len_bytes, rest) = match split_at_checked(rest, 4) {
      Some(x) => x,
      None => {
        self.bytes = &[];
        return Some(Err(IffError::TruncatedChunkHeader));
      }
    };
    let length = u32_be(len_bytes) as usize;
    let (data, rest) = match split_at_checked(rest, length) {
      Some(x) => x,
      None => {
        self.bytes = &[];
        return Some(Err(IffError::TruncatedChunkPayload));
      }
    };
    // word-align: a pad byte follows an odd-length payload, but legacy
    // writers sometimes omit it at the very end of the file.
    let rest = if length % 2 == 1 {
      match split_at_checked(rest, 1) {
        Some((_, r)) => r,
        None => &[],
      }
    } else {
      rest
    };
    self.bytes = rest;
    let tag: [u8; 4] = tag_bytes.try_into().unwrap();
    Some(Ok(RawChunk { tag, data }))
  }
}

#[inline]
fn split_at_checked(bytes: &[u8], n: usize) -> Option<(&[u8], &[u8])> {
  if bytes.len() < n {
    None
  } else {
    Some(bytes.split_at(n))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec::Vec;

  #[test]
  fn walks_a_minimal_form() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"FORM");
    bytes.extend_from_slice(&20u32.to_be_bytes());
    bytes.extend_from_slice(b"ILBM");
    bytes.extend_from_slice(b"BMHD");
    bytes.extend_from_slice(&4u32.to_be_bytes());
    bytes.extend_from_slice(&[1, 2, 3, 4]);
    let form = FormFile::new(&bytes).unwrap();
    assert_eq!(&form.form_type, b"ILBM");
    let chunks: Vec<_> = form.chunks().map(|c| c.unwrap()).collect();
    assert_eq!(chunks.len(), 1);
    assert_eq!(&chunks[0].tag, b"BMHD");
    assert_eq!(chunks[0].data, &[1, 2, 3, 4]);
  }

  #[test]
  fn odd_length_chunk_is_pad_aligned() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"FORM");
    bytes.extend_from_slice(&26u32.to_be_bytes());
    bytes.extend_from_slice(b"ILBM");
    bytes.extend_from_slice(b"ANNO");
    bytes.extend_from_slice(&3u32.to_be_bytes());
    bytes.extend_from_slice(b"hi!");
    bytes.push(0); // pad
    bytes.extend_from_slice(b"BMHD");
    bytes.extend_from_slice(&4u32.to_be_bytes());
    bytes.extend_from_slice(&[9, 9, 9, 9]);
    let form = FormFile::new(&bytes).unwrap();
    let chunks: Vec<_> = form.chunks().map(|c| c.unwrap()).collect();
    assert_eq!(chunks.len(), 2);
    assert_eq!(&chunks[1].tag, b"BMHD");
  }

  #[test]
  fn missing_pad_byte_at_eof_is_tolerated() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"FORM");
    bytes.extend_from_slice(&15u32.to_be_bytes());
    bytes.extend_from_slice(b"ILBM");
    bytes.extend_from_slice(b"ANNO");
    bytes.extend_from_slice(&3u32.to_be_bytes());
    bytes.extend_from_slice(b"hi!");
    let form = FormFile::new(&bytes).unwrap();
    let chunks: Vec<_> = form.chunks().map(|c| c.unwrap()).collect();
    assert_eq!(chunks.len(), 1);
  }

  #[test]
  fn rejects_non_form() {
    let bytes = b"XXXX\x00\x00\x00\x04ABCD";
    assert!(FormFile::new(bytes).is_err());
  }
}
