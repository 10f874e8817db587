//! PBM: chunky 8-bit-per-pixel packed bitmap (same header as ILBM, no
//! planar storage).

use crate::error::IffError;
use crate::formats::{materialize, DecodeOutput};
use crate::headers::{BitmapHeader, Palette};
use alloc::vec;

pub(crate) fn decode(header: &BitmapHeader, palette: Option<&Palette>, body: &[u8]) -> Result<DecodeOutput, IffError> {
  let width = header.width as usize;
  let height = header.height as usize;
  let total_len = width * height;
  let raw = materialize(body, header.compression, total_len)?;

  let mut pixels = vec![0u8; width * height * 3];
  let mut shadow = vec![0u8; width * height];
  for (i, &idx) in raw.iter().enumerate() {
    let clamped = match palette {
      Some(p) if !p.is_empty() => (idx as usize).min(p.len() - 1),
      _ => idx as usize,
    };
    shadow[i] = clamped as u8;
    let color = palette.map_or(pixel_formats::r8g8b8_Unorm { r: idx, g: idx, b: idx }, |p| p.lookup(clamped));
    pixels[i * 3] = color.r;
    pixels[i * 3 + 1] = color.g;
    pixels[i * 3 + 2] = color.b;
  }

  Ok(DecodeOutput { pixels, has_alpha: false, palette_index_shadow: Some(shadow), partial_decode: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::{BitmapCompression, Masking};

  #[test]
  fn scenario_5_byterun1_compressed_row() {
    let h = BitmapHeader {
      width: 6,
      height: 1,
      x_origin: 0,
      y_origin: 0,
      n_planes: 8,
      masking: Masking::None,
      compression: BitmapCompression::ByteRun1,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: 6,
      page_height: 1,
    };
    // 0xFE (repeat next 3x), 0x05, 0x02 (literal 3), 01 02 03
    let body = [0xFE, 0x05, 0x02, 0x01, 0x02, 0x03];
    let out = decode(&h, None, &body).unwrap();
    assert_eq!(out.palette_index_shadow.unwrap(), alloc::vec![5, 5, 5, 1, 2, 3]);
  }
}
