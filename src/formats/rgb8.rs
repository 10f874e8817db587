//! RGB8: 8-bits-per-channel true colour, 24 or 25 bitplanes (a 25th plane,
//! if present, is discarded alpha).

use crate::error::IffError;
use crate::formats::{materialize, DecodeOutput};
use crate::headers::BitmapHeader;
use crate::planes::{assemble_row, rowbytes};
use alloc::vec;
use alloc::vec::Vec;

pub(crate) fn decode(header: &BitmapHeader, body: &[u8]) -> Result<DecodeOutput, IffError> {
  let n_planes = header.n_planes as usize;
  if n_planes != 24 && n_planes != 25 {
    return Err(IffError::PlaneCountInvalidForFormat);
  }
  let width = header.width as u32;
  let height = header.height as u32;
  let stride = rowbytes(width);
  let total_len = stride * n_planes * height as usize;
  let raw = materialize(body, header.compression, total_len)?;

  let mut pixels = vec![0u8; width as usize * height as usize * 3];
  let mut word_row = vec![0u32; width as usize];
  let mut plane_row_refs: Vec<&[u8]> = Vec::with_capacity(24);

  for row in 0..height as usize {
    let row_off = row * n_planes * stride;
    plane_row_refs.clear();
    for p in 0..24 {
      let off = row_off + p * stride;
      plane_row_refs.push(&raw[off..off + stride]);
    }
    assemble_row(width, &plane_row_refs, &mut word_row);
    for col in 0..width as usize {
      let v = word_row[col];
      let off = (row * width as usize + col) * 3;
      pixels[off] = (v & 0xFF) as u8;
      pixels[off + 1] = ((v >> 8) & 0xFF) as u8;
      pixels[off + 2] = ((v >> 16) & 0xFF) as u8;
    }
  }

  Ok(DecodeOutput { pixels, has_alpha: false, palette_index_shadow: None, partial_decode: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::{BitmapCompression, Masking};

  fn header(n_planes: u8) -> BitmapHeader {
    BitmapHeader {
      width: 1,
      height: 1,
      x_origin: 0,
      y_origin: 0,
      n_planes,
      masking: Masking::None,
      compression: BitmapCompression::None,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 1,
      page_height: 1,
    }
  }

  #[test]
  fn rejects_wrong_plane_count() {
    assert!(decode(&header(16), &[]).is_err());
  }

  #[test]
  fn full_bright_24_planes() {
    let body = vec![0x80u8; 2 * 24];
    let out = decode(&header(24), &body).unwrap();
    assert_eq!(out.pixels, alloc::vec![0xFF, 0xFF, 0xFF]);
  }
}
