//! RGBN: 4-bits-per-channel true colour, 12 or 13 bitplanes (red nibble,
//! green nibble, blue nibble, plus an optional discarded alpha plane).

use crate::error::IffError;
use crate::formats::{materialize, DecodeOutput};
use crate::headers::BitmapHeader;
use crate::planes::rowbytes;
use alloc::vec;
use alloc::vec::Vec;
use bitfrob::u8_replicate_bits;

pub(crate) fn decode(header: &BitmapHeader, body: &[u8]) -> Result<DecodeOutput, IffError> {
  let n_planes = header.n_planes as usize;
  if n_planes != 12 && n_planes != 13 {
    return Err(IffError::PlaneCountInvalidForFormat);
  }
  let width = header.width as u32;
  let height = header.height as u32;
  let stride = rowbytes(width);
  let total_len = stride * n_planes * height as usize;
  let raw = materialize(body, header.compression, total_len)?;

  let mut pixels = vec![0u8; width as usize * height as usize * 3];
  let mut nibble_row = vec![0u32; width as usize];
  let mut plane_row_refs: Vec<&[u8]> = Vec::with_capacity(12);

  for row in 0..height as usize {
    let row_off = row * n_planes * stride;
    // Only the 12 colour planes feed pixel assembly; a 13th plane (alpha)
    // is consumed for byte alignment but its bits are discarded.
    plane_row_refs.clear();
    for p in 0..12 {
      let off = row_off + p * stride;
      plane_row_refs.push(&raw[off..off + stride]);
    }
    crate::planes::assemble_row(width, &plane_row_refs, &mut nibble_row);
    for col in 0..width as usize {
      let v = nibble_row[col];
      let r = u8_replicate_bits(4, (v & 0xF) as u8);
      let g = u8_replicate_bits(4, ((v >> 4) & 0xF) as u8);
      let b = u8_replicate_bits(4, ((v >> 8) & 0xF) as u8);
      let off = (row * width as usize + col) * 3;
      pixels[off] = r;
      pixels[off + 1] = g;
      pixels[off + 2] = b;
    }
  }

  Ok(DecodeOutput { pixels, has_alpha: false, palette_index_shadow: None, partial_decode: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::{BitmapCompression, Masking};

  #[test]
  fn rejects_wrong_plane_count() {
    let h = BitmapHeader {
      width: 1,
      height: 1,
      x_origin: 0,
      y_origin: 0,
      n_planes: 10,
      masking: Masking::None,
      compression: BitmapCompression::None,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 1,
      page_height: 1,
    };
    assert!(decode(&h, &[]).is_err());
  }

  #[test]
  fn thirteenth_plane_is_discarded_but_consumed() {
    let h = BitmapHeader {
      width: 1,
      height: 1,
      x_origin: 0,
      y_origin: 0,
      n_planes: 13,
      masking: Masking::None,
      compression: BitmapCompression::None,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 1,
      page_height: 1,
    };
    let body = vec![0x80u8; 2 * 13];
    let out = decode(&h, &body).unwrap();
    assert_eq!(out.pixels, alloc::vec![0xFF, 0xFF, 0xFF]);
  }
}
