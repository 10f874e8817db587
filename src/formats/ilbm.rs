//! ILBM: the interleaved bitmap, plus its HAM and EHB sub-modes.

use crate::error::IffError;
use crate::formats::{materialize, DecodeOutput};
use crate::headers::{BitmapHeader, Masking, Palette, ViewportMode};
use crate::planes::{assemble_mask_row, assemble_row, rowbytes};
use alloc::vec;
use alloc::vec::Vec;
use pixel_formats::r8g8b8_Unorm;

/// Decodes a `BODY` chunk under plain, HAM, or EHB interpretation
/// depending on `viewport`'s mode bits and `header.n_planes`.
pub(crate) fn decode(
  header: &BitmapHeader,
  palette: Option<&Palette>,
  viewport: Option<ViewportMode>,
  body: &[u8],
) -> Result<DecodeOutput, IffError> {
  let width = header.width as u32;
  let height = header.height as u32;
  let n_planes = header.n_planes as usize;
  let has_mask = matches!(header.masking, Masking::HasMask);
  let is_ham = viewport.is_some_and(ViewportMode::is_ham) && n_planes >= 6;
  let is_ehb = viewport.is_some_and(ViewportMode::is_ehb) && n_planes == 6;

  if is_ham && n_planes < 6 {
    return Err(IffError::PlaneCountInvalidForFormat);
  }
  if is_ehb && n_planes != 6 {
    return Err(IffError::PlaneCountInvalidForFormat);
  }
  if matches!(header.masking, Masking::HasTransparentColor) {
    if let Some(p) = palette {
      if header.transparent_color as usize >= p.len() {
        return Err(IffError::PaletteIndexOutOfRange);
      }
    }
  }

  let stride = rowbytes(width);
  let planes_per_row = n_planes + usize::from(has_mask);
  let total_len = stride * planes_per_row * height as usize;
  let raw = materialize(body, header.compression, total_len)?;

  let has_alpha = has_mask;
  let bpp = if has_alpha { 4 } else { 3 };
  let mut pixels = vec![0u8; width as usize * height as usize * bpp];
  let produces_shadow = !is_ham && !is_ehb;
  let mut shadow = if produces_shadow { Some(vec![0u8; (width * height) as usize]) } else { None };

  let mut idx_row = vec![0u32; width as usize];
  let mut alpha_row = vec![false; width as usize];
  let mut plane_row_refs: Vec<&[u8]> = Vec::with_capacity(n_planes);

  for row in 0..height as usize {
    let row_off = row * planes_per_row * stride;
    plane_row_refs.clear();
    for p in 0..n_planes {
      let off = row_off + p * stride;
      plane_row_refs.push(&raw[off..off + stride]);
    }
    assemble_row(width, &plane_row_refs, &mut idx_row);
    if has_mask {
      let mask_off = row_off + n_planes * stride;
      assemble_mask_row(width, &raw[mask_off..mask_off + stride], &mut alpha_row);
    }

    let mut ham_carry = r8g8b8_Unorm { r: 0, g: 0, b: 0 };
    for col in 0..width as usize {
      let idx = idx_row[col] as usize;
      let pixel_off = (row * width as usize + col) * bpp;

      let color = if is_ham {
        ham_carry = ham_step(palette, n_planes, idx, ham_carry);
        ham_carry
      } else if is_ehb {
        ehb_color(palette, idx)
      } else {
        let clamped = clamp_index(palette, idx);
        if let Some(s) = shadow.as_mut() {
          s[row * width as usize + col] = clamped as u8;
        }
        palette.map_or(grayscale_from_index(idx, n_planes), |p| p.lookup(clamped))
      };

      pixels[pixel_off] = color.r;
      pixels[pixel_off + 1] = color.g;
      pixels[pixel_off + 2] = color.b;
      if has_alpha {
        pixels[pixel_off + 3] = if alpha_row[col] { 0xFF } else { 0x00 };
      }
    }
  }

  Ok(DecodeOutput { pixels, has_alpha, palette_index_shadow: shadow, partial_decode: false })
}

fn clamp_index(palette: Option<&Palette>, idx: usize) -> usize {
  match palette {
    Some(p) if !p.is_empty() => idx.min(p.len() - 1),
    _ => idx,
  }
}

/// Boundary behaviour: a single uncompressed plane with no `CMAP` decodes
/// as grayscale, scaling the 1-bit index to full black/white.
fn grayscale_from_index(idx: usize, n_planes: usize) -> r8g8b8_Unorm {
  let max = (1u32 << n_planes.min(31)).saturating_sub(1).max(1);
  let v = ((idx as u32 * 255) / max) as u8;
  r8g8b8_Unorm { r: v, g: v, b: v }
}

fn ehb_color(palette: Option<&Palette>, idx: usize) -> r8g8b8_Unorm {
  let Some(p) = palette else {
    return r8g8b8_Unorm { r: 0, g: 0, b: 0 };
  };
  if idx < 32 {
    p.lookup(clamp_index(Some(p), idx))
  } else {
    let base = p.lookup(clamp_index(Some(p), idx - 32));
    r8g8b8_Unorm { r: base.r / 2, g: base.g / 2, b: base.b / 2 }
  }
}

/// One HAM pixel step: top 2 bits of the index select "load palette" or
/// "modify one component", carrying the previous pixel's colour forward.
fn ham_step(palette: Option<&Palette>, n_planes: usize, idx: usize, carry: r8g8b8_Unorm) -> r8g8b8_Unorm {
  let hambits = n_planes - 2;
  let hammask = (1usize << hambits) - 1;
  let hamshift = 8usize.saturating_sub(hambits);
  let code = idx >> hambits;
  let value = idx & hammask;
  match code {
    0 => palette.map_or(carry, |p| p.lookup(clamp_index(Some(p), value))),
    1 => {
      let b = (value as u8) << hamshift.min(7);
      r8g8b8_Unorm { r: carry.r, g: carry.g, b }
    }
    2 => {
      let r = (value as u8) << hamshift.min(7);
      r8g8b8_Unorm { r, g: carry.g, b: carry.b }
    }
    _ => {
      let g = (value as u8) << hamshift.min(7);
      r8g8b8_Unorm { r: carry.r, g, b: carry.b }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::{BitmapCompression, Masking};

  fn header(width: u16, height: u16, n_planes: u8) -> BitmapHeader {
    BitmapHeader {
      width,
      height,
      x_origin: 0,
      y_origin: 0,
      n_planes,
      masking: Masking::None,
      compression: BitmapCompression::None,
      transparent_color: 0,
      x_aspect: 1,
      y_aspect: 1,
      page_width: width as i16,
      page_height: height as i16,
    }
  }

  #[test]
  fn scenario_1_2x2_one_plane() {
    let h = header(2, 2, 1);
    let palette = Palette::parse(&[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]).unwrap();
    let body = [0x80u8, 0x00, 0x40, 0x00]; // row0 plane, row1 plane, rowbytes=2
    let out = decode(&h, Some(&palette), None, &body).unwrap();
    assert_eq!(out.pixels, alloc::vec![0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);
  }

  #[test]
  fn scenario_3_ham6_two_pixels() {
    let h = header(2, 1, 6);
    let palette = Palette::parse(&[10, 20, 30]).unwrap();
    // idx0 = 0b00_0000 (code 0, value 0) -> palette[0] = (10,20,30)
    // idx1 = 0b10_1111 (code 2, value 15) -> red <- 15<<4 = 0xF0
    // 6 planes, each row 1 pixel wide needs rowbytes(2)=2 bytes/plane.
    // Column 0 bit7, column1 bit6 of each plane byte.
    let mut body = vec![0u8; 6 * 2];
    let idx0 = 0b00_0000u8;
    let idx1 = 0b10_1111u8;
    for plane in 0..6 {
      let bit0 = (idx0 >> plane) & 1;
      let bit1 = (idx1 >> plane) & 1;
      let byte = (bit0 << 7) | (bit1 << 6);
      body[plane as usize * 2] = byte;
    }
    let viewport = ViewportMode(crate::headers::VM_HAM);
    let out = decode(&h, Some(&palette), Some(viewport), &body).unwrap();
    assert_eq!(&out.pixels[0..3], &[10, 20, 30]);
    assert_eq!(&out.pixels[3..6], &[0xF0, 20, 30]);
  }

  #[test]
  fn scenario_4_ehb_halves_component() {
    let h = header(1, 1, 6);
    let mut cmap = vec![0u8; 64 * 3];
    cmap[20 * 3] = 80;
    cmap[20 * 3 + 1] = 40;
    cmap[20 * 3 + 2] = 20;
    let palette = Palette::parse(&cmap).unwrap();
    let idx = 52u8; // 20 + 32
    let mut body = vec![0u8; 6 * 2];
    for plane in 0..6 {
      let bit = (idx >> plane) & 1;
      body[plane as usize * 2] = bit << 7;
    }
    let viewport = ViewportMode(crate::headers::VM_EXTRA_HALFBRITE);
    let out = decode(&h, Some(&palette), Some(viewport), &body).unwrap();
    assert_eq!(&out.pixels[0..3], &[40, 20, 10]);
  }
}
