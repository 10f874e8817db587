//! Format analyser: derives `is_grayscale` / `is_indexed` / `has_alpha`
//! from the decoded headers and palette (§4.5).

use crate::headers::Palette;

/// `is_grayscale` for a plain (non-HAM, non-EHB) ILBM/PBM/ACBM decode:
/// true for every palette entry being `R == G == B`, or — the single-plane
/// mask-free boundary case — always true when there's no palette at all.
#[must_use]
pub(crate) fn ilbm_family_is_grayscale(is_ham: bool, is_ehb: bool, n_planes: u8, palette: Option<&Palette>) -> bool {
  if is_ham || is_ehb {
    return false;
  }
  match palette {
    Some(p) => p.is_grayscale(),
    None => n_planes == 1,
  }
}

/// True colour / HAM / DEEP / RGBN / RGB8 / YUVN are never grayscale by
/// this analyser's rules.
#[must_use]
pub(crate) const fn true_color_is_grayscale() -> bool {
  false
}

/// FAXX always decodes against a synthesized black/white palette, which
/// is trivially grayscale.
#[must_use]
pub(crate) const fn faxx_is_grayscale() -> bool {
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_plane_no_cmap_is_grayscale() {
    assert!(ilbm_family_is_grayscale(false, false, 1, None));
  }

  #[test]
  fn ham_is_never_grayscale() {
    assert!(!ilbm_family_is_grayscale(true, false, 6, None));
  }

  #[test]
  fn grayscale_palette_is_detected() {
    let palette = Palette::parse(&[10, 10, 10, 200, 200, 200]).unwrap();
    assert!(ilbm_family_is_grayscale(false, false, 1, Some(&palette)));
  }

  #[test]
  fn color_palette_is_not_grayscale() {
    let palette = Palette::parse(&[255, 0, 0]).unwrap();
    assert!(!ilbm_family_is_grayscale(false, false, 1, Some(&palette)));
  }
}
