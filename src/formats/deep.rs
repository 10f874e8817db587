//! DEEP: true-colour with a channel layout declared by `DPEL`. Practical
//! files use 24 planes divisible by three (red, green, blue thirds);
//! compression beyond `none`/ByteRun1 (Huffman, dynamic Huffman, JPEG,
//! TVDC) is recognised but not decoded.

use crate::error::IffError;
use crate::formats::DecodeOutput;
use crate::headers::{DeepCompression, DeepElements};
use crate::planes::{assemble_row, rowbytes};
use alloc::vec;
use alloc::vec::Vec;

pub(crate) fn decode(width: u32, height: u32, elements: &DeepElements, compression: DeepCompression, body: &[u8]) -> Result<DecodeOutput, IffError> {
  let n_planes = elements.total_planes() as usize;
  if n_planes == 0 || n_planes % 3 != 0 {
    return Err(IffError::PlaneCountInvalidForFormat);
  }
  if n_planes > 32 {
    return Err(IffError::UnsupportedDeepCompression);
  }
  let channel_bits = (n_planes / 3) as u32;
  let stride = rowbytes(width);
  let total_len = stride * n_planes * height as usize;
  let raw = match compression {
    DeepCompression::None => {
      if body.len() < total_len {
        return Err(IffError::TruncatedChunkPayload);
      }
      Vec::from(&body[..total_len])
    }
    DeepCompression::ByteRun1 => crate::formats::materialize_byterun1(body, total_len)?,
    DeepCompression::Unsupported(_) => return Err(IffError::UnsupportedDeepCompression),
  };

  let mut pixels = vec![0u8; width as usize * height as usize * 3];
  let mut word_row = vec![0u32; width as usize];
  let mut plane_row_refs: Vec<&[u8]> = Vec::with_capacity(n_planes);

  for row in 0..height as usize {
    let row_off = row * n_planes * stride;
    plane_row_refs.clear();
    for p in 0..n_planes {
      let off = row_off + p * stride;
      plane_row_refs.push(&raw[off..off + stride]);
    }
    assemble_row(width, &plane_row_refs, &mut word_row);
    for col in 0..width as usize {
      let v = word_row[col] as u64;
      let mask = (1u64 << channel_bits) - 1;
      let r_raw = v & mask;
      let g_raw = (v >> channel_bits) & mask;
      let b_raw = (v >> (2 * channel_bits)) & mask;
      let off = (row * width as usize + col) * 3;
      pixels[off] = upscale(r_raw, channel_bits);
      pixels[off + 1] = upscale(g_raw, channel_bits);
      pixels[off + 2] = upscale(b_raw, channel_bits);
    }
  }

  Ok(DecodeOutput { pixels, has_alpha: false, palette_index_shadow: None, partial_decode: false })
}

fn upscale(value: u64, bits: u32) -> u8 {
  if bits == 0 {
    return 0;
  }
  let max = (1u64 << bits) - 1;
  ((value * 255) / max.max(1)) as u8
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::DeepElement;

  #[test]
  fn rejects_non_multiple_of_three() {
    let elements = DeepElements { elements: alloc::vec![DeepElement { c_type: 0, c_bit_depth: 4 }] };
    assert!(decode(1, 1, &elements, DeepCompression::None, &[]).is_err());
  }

  #[test]
  fn unsupported_compression_errors() {
    let elements = DeepElements {
      elements: alloc::vec![
        DeepElement { c_type: 0, c_bit_depth: 8 },
        DeepElement { c_type: 1, c_bit_depth: 8 },
        DeepElement { c_type: 2, c_bit_depth: 8 },
      ],
    };
    assert!(decode(1, 1, &elements, DeepCompression::Unsupported(3), &[]).is_err());
  }

  #[test]
  fn decodes_full_bright_pixel() {
    let elements = DeepElements {
      elements: alloc::vec![
        DeepElement { c_type: 0, c_bit_depth: 8 },
        DeepElement { c_type: 1, c_bit_depth: 8 },
        DeepElement { c_type: 2, c_bit_depth: 8 },
      ],
    };
    let body = vec![0x80u8; 2 * 24];
    let out = decode(1, 1, &elements, DeepCompression::None, &body).unwrap();
    assert_eq!(out.pixels, alloc::vec![0xFF, 0xFF, 0xFF]);
  }
}
