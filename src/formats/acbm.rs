//! ACBM: the Amiga Contiguous Bitmap. Same pixel semantics as plain ILBM
//! but the data chunk is plane-major (all rows of plane 0, then all rows
//! of plane 1, ...) rather than row-major/interleaved. Compression is
//! forbidden by the format.

use crate::error::IffError;
use crate::formats::DecodeOutput;
use crate::headers::{BitmapCompression, BitmapHeader, Palette};
use crate::planes::{assemble_row, rowbytes};
use alloc::vec;
use alloc::vec::Vec;

pub(crate) fn decode(header: &BitmapHeader, palette: Option<&Palette>, body: &[u8]) -> Result<DecodeOutput, IffError> {
  if header.compression != BitmapCompression::None {
    return Err(IffError::CompressionForbiddenForFormat);
  }
  let width = header.width as u32;
  let height = header.height as u32;
  let n_planes = header.n_planes as usize;
  let stride = rowbytes(width);
  let plane_len = stride * height as usize;
  let total_len = plane_len * n_planes;
  if body.len() < total_len {
    return Err(IffError::TruncatedChunkPayload);
  }

  let mut pixels = vec![0u8; width as usize * height as usize * 3];
  let mut shadow = vec![0u8; (width * height) as usize];
  let mut idx_row = vec![0u32; width as usize];
  let mut plane_row_refs: Vec<&[u8]> = Vec::with_capacity(n_planes);

  for row in 0..height as usize {
    plane_row_refs.clear();
    for p in 0..n_planes {
      let off = p * plane_len + row * stride;
      plane_row_refs.push(&body[off..off + stride]);
    }
    assemble_row(width, &plane_row_refs, &mut idx_row);
    for col in 0..width as usize {
      let idx = idx_row[col] as usize;
      let clamped = match palette {
        Some(p) if !p.is_empty() => idx.min(p.len() - 1),
        _ => idx,
      };
      shadow[row * width as usize + col] = clamped as u8;
      let color = palette.map_or(pixel_formats::r8g8b8_Unorm { r: 0, g: 0, b: 0 }, |p| p.lookup(clamped));
      let off = (row * width as usize + col) * 3;
      pixels[off] = color.r;
      pixels[off + 1] = color.g;
      pixels[off + 2] = color.b;
    }
  }

  Ok(DecodeOutput { pixels, has_alpha: false, palette_index_shadow: Some(shadow), partial_decode: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::Masking;

  #[test]
  fn restripes_plane_major_into_rows() {
    let h = BitmapHeader {
      width: 2,
      height: 2,
      x_origin: 0,
      y_origin: 0,
      n_planes: 1,
      masking: Masking::None,
      compression: BitmapCompression::None,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 2,
      page_height: 2,
    };
    // Plane-major: plane 0's row0 then row1 (rowbytes(2) = 2 each).
    let body = [0x80u8, 0x00, 0x40, 0x00];
    let palette = Palette::parse(&[0, 0, 0, 255, 255, 255]).unwrap();
    let out = decode(&h, Some(&palette), &body).unwrap();
    assert_eq!(out.palette_index_shadow.unwrap(), alloc::vec![1, 0, 0, 1]);
  }

  #[test]
  fn compression_flag_is_rejected() {
    let h = BitmapHeader {
      width: 2,
      height: 1,
      x_origin: 0,
      y_origin: 0,
      n_planes: 1,
      masking: Masking::None,
      compression: BitmapCompression::ByteRun1,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 2,
      page_height: 1,
    };
    assert!(decode(&h, None, &[0, 0]).is_err());
  }
}
