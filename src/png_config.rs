//! Derives the handoff contract an external PNG encoder needs from a
//! decoded [`ImageHandle`] (§4.5/§6): colour type, bit depth, palette, and
//! an optional tRNS entry.

use crate::headers::Masking;
use crate::image::{AnalyserFlags, ImageHandle, PrimaryHeader};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// The PNG colour types this crate can derive a config for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
  Gray,
  Rgb,
  Rgba,
  Palette,
}

/// One RGB palette entry, already 4-bit-upscaled if the source `CMAP` was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// A transparency entry for indexed PNG output: "index `index` is
/// transparent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrnsSpec {
  pub index: u8,
}

/// The full handoff to an (unimplemented, external) PNG encoder.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct PngConfig {
  pub color_type: ColorType,
  pub bit_depth: u8,
  pub has_alpha: bool,
  pub palette: Option<Vec<PaletteEntry>>,
  pub trns: Option<TrnsSpec>,
}

fn clamp_bit_depth(n: u8) -> u8 {
  match n {
    0 | 1 => 1,
    2 => 2,
    3 | 4 => 4,
    _ => 8,
  }
}

fn bits_for_palette_len(len: usize) -> u8 {
  let mut bits = 1u32;
  while (1usize << bits) < len {
    bits += 1;
  }
  clamp_bit_depth(bits as u8)
}

/// Derives [`PngConfig`] from a handle's header, palette, analyser flags,
/// and (if decoded) palette-index shadow. Callers may invoke this before
/// [`ImageHandle::decode`]; in that case tRNS is always skipped (§4.5).
#[cfg(feature = "alloc")]
#[must_use]
pub fn derive(handle: &ImageHandle<'_>, opaque: bool) -> PngConfig {
  let flags = handle.analyser_flags();

  if flags.is_ham || flags.is_ehb || !flags.is_indexed {
    return true_color_config(flags);
  }

  match handle.palette() {
    Some(p) if flags.is_grayscale => PngConfig {
      color_type: ColorType::Gray,
      bit_depth: bits_for_palette_len(p.len()),
      has_alpha: false,
      palette: None,
      trns: None,
    },
    Some(p) => PngConfig {
      color_type: ColorType::Palette,
      bit_depth: bits_for_palette_len(p.len()),
      has_alpha: false,
      palette: Some(copy_palette(p)),
      trns: derive_trns(handle, opaque),
    },
    None if flags.is_grayscale => {
      let n_planes = match &handle.header() {
        PrimaryHeader::Bitmap(b) => b.n_planes,
        PrimaryHeader::Fax(_) => 1,
        PrimaryHeader::Yuv(_) => 8,
      };
      PngConfig { color_type: ColorType::Gray, bit_depth: clamp_bit_depth(n_planes), has_alpha: false, palette: None, trns: None }
    }
    None => PngConfig { color_type: ColorType::Rgb, bit_depth: 8, has_alpha: false, palette: None, trns: None },
  }
}

fn true_color_config(flags: AnalyserFlags) -> PngConfig {
  PngConfig {
    color_type: if flags.has_alpha { ColorType::Rgba } else { ColorType::Rgb },
    bit_depth: 8,
    has_alpha: flags.has_alpha,
    palette: None,
    trns: None,
  }
}

#[cfg(feature = "alloc")]
fn copy_palette(palette: &crate::headers::Palette) -> Vec<PaletteEntry> {
  let mut out = Vec::new();
  for i in 0..palette.len() {
    let c = palette.lookup(i);
    out.push(PaletteEntry { r: c.r, g: c.g, b: c.b });
  }
  out
}

#[cfg(feature = "alloc")]
fn derive_trns(handle: &ImageHandle<'_>, opaque: bool) -> Option<TrnsSpec> {
  let header = match handle.header() {
    PrimaryHeader::Bitmap(b) => b,
    _ => return None,
  };
  if !matches!(header.masking, Masking::HasTransparentColor) {
    return None;
  }
  let transparent_index = header.transparent_color as u8;
  if opaque && transparent_index == 0 {
    return None;
  }
  let shadow = handle.palette_index_shadow()?;
  if shadow.iter().any(|&idx| idx == transparent_index) {
    Some(TrnsSpec { index: transparent_index })
  } else {
    None
  }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
  use super::*;

  #[test]
  fn bit_depth_clamps_to_png_set() {
    assert_eq!(bits_for_palette_len(2), 1);
    assert_eq!(bits_for_palette_len(3), 2);
    assert_eq!(bits_for_palette_len(16), 4);
    assert_eq!(bits_for_palette_len(200), 8);
  }

  #[test]
  fn true_color_flags_yield_rgb_or_rgba() {
    let opaque = AnalyserFlags { has_alpha: false, ..AnalyserFlags::default() };
    assert_eq!(true_color_config(opaque).color_type, ColorType::Rgb);
    let alpha = AnalyserFlags { has_alpha: true, ..AnalyserFlags::default() };
    assert_eq!(true_color_config(alpha).color_type, ColorType::Rgba);
  }
}
