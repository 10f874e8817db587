//! YUVN: subsampled YUV. Chrominance is upsampled by pixel replication and
//! converted per-pixel to RGB using the JFIF/CCIR-601 coefficients; only
//! uncompressed YUVN is supported.

use crate::error::IffError;
use crate::formats::DecodeOutput;
use crate::headers::{YuvHeader, YuvSubsampling};
use alloc::vec;

fn chroma_ratio(mode: YuvSubsampling) -> u32 {
  match mode {
    YuvSubsampling::Mode444 => 1,
    YuvSubsampling::Mode422 => 2,
    YuvSubsampling::Mode411 => 4,
  }
}

/// Converts one YUV triple to RGB, JFIF full-range coefficients, clamped.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
  let y = y as i32;
  let cb = u as i32 - 128;
  let cr = v as i32 - 128;
  let r = y + (91881 * cr >> 16);
  let g = y - (22554 * cb >> 16) - (46802 * cr >> 16);
  let b = y + (116130 * cb >> 16);
  (r.clamp(0, 255) as u8, g.clamp(0, 255) as u8, b.clamp(0, 255) as u8)
}

pub(crate) fn decode(
  header: &YuvHeader,
  daty: &[u8],
  datu: &[u8],
  datv: &[u8],
  data: Option<&[u8]>,
) -> Result<DecodeOutput, IffError> {
  let width = header.width as u32;
  let height = header.height as u32;
  let mode = header.subsampling()?;
  let ratio = chroma_ratio(mode);

  if width % ratio != 0 {
    return Err(IffError::YuvnSubsamplingWidthMismatch);
  }
  if header.is_interlaced() && height % 2 != 0 {
    return Err(IffError::YuvnInterlaceHeightMismatch);
  }

  let chroma_width = (width / ratio) as usize;
  let luma_len = (width * height) as usize;
  let chroma_len = chroma_width * height as usize;
  if daty.len() < luma_len || datu.len() < chroma_len || datv.len() < chroma_len {
    return Err(IffError::TruncatedChunkPayload);
  }
  let has_alpha = data.is_some();
  if let Some(a) = data {
    if a.len() < luma_len {
      return Err(IffError::TruncatedChunkPayload);
    }
  }

  let bpp = if has_alpha { 4 } else { 3 };
  let mut pixels = vec![0u8; width as usize * height as usize * bpp];
  for row in 0..height as usize {
    for col in 0..width as usize {
      let luma_idx = row * width as usize + col;
      let chroma_idx = row * chroma_width + col / ratio as usize;
      let (r, g, b) = yuv_to_rgb(daty[luma_idx], datu[chroma_idx], datv[chroma_idx]);
      let off = luma_idx * bpp;
      pixels[off] = r;
      pixels[off + 1] = g;
      pixels[off + 2] = b;
      if has_alpha {
        pixels[off + 3] = data.unwrap()[luma_idx];
      }
    }
  }

  Ok(DecodeOutput { pixels, has_alpha, palette_index_shadow: None, partial_decode: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::TvNorm;

  fn header(width: u16, height: u16, mode: u8, flags: u8) -> YuvHeader {
    YuvHeader {
      width,
      height,
      page_width: width,
      page_height: height,
      left_edge: 0,
      top_edge: 0,
      aspect_x: 1,
      aspect_y: 1,
      compress: 0,
      flags,
      mode,
      norm: TvNorm::Ntsc,
    }
  }

  #[test]
  fn mode_444_full_white() {
    let h = header(2, 1, 0, 0);
    let daty = [235u8, 235];
    let datu = [128u8, 128];
    let datv = [128u8, 128];
    let out = decode(&h, &daty, &datu, &datv, None).unwrap();
    assert_eq!(out.pixels.len(), 6);
    assert!(!out.has_alpha);
  }

  #[test]
  fn mode_411_requires_width_multiple_of_four() {
    let h = header(2, 1, 2, 0);
    assert!(matches!(decode(&h, &[0, 0], &[0], &[0], None), Err(IffError::YuvnSubsamplingWidthMismatch)));
  }

  #[test]
  fn interlaced_requires_even_height() {
    let h = header(4, 1, 0, 0x01);
    assert!(matches!(
      decode(&h, &[0; 4], &[0; 4], &[0; 4], None),
      Err(IffError::YuvnInterlaceHeightMismatch)
    ));
  }
}
