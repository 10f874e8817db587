//! The metadata vault: copy-and-store for informational chunks this core
//! doesn't interpret further (annotations, text, colour-cycle ranges, and
//! the embedded EXIF/IPTC/XMP/ICC/GeoTIFF passthrough chunks).
//!
//! Lazily present — a handle that parsed a file with none of these chunks
//! carries no vault at all.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// One informational chunk, kept verbatim for the PNG back-end (or any
/// other downstream consumer) to re-emit unexamined.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct MetadataChunk {
  pub tag: [u8; 4],
  pub data: Vec<u8>,
}

/// A colour-cycle range from a `CRNG` chunk, kept structured rather than
/// raw since the rate/flags fields are cheap to decode and occasionally
/// useful to a caller even though this core never animates a cycle.
#[derive(Debug, Clone, Copy)]
pub struct ColorRange {
  pub rate: u16,
  pub flags: u16,
  pub low: u8,
  pub high: u8,
}

/// Everything captured from collection and optional-metadata chunks for
/// one handle.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default)]
pub struct MetadataVault {
  pub annotations: Vec<Vec<u8>>,
  pub text: Vec<Vec<u8>>,
  pub color_ranges: Vec<ColorRange>,
  pub other: Vec<MetadataChunk>,
}

#[cfg(feature = "alloc")]
impl MetadataVault {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.annotations.is_empty() && self.text.is_empty() && self.color_ranges.is_empty() && self.other.is_empty()
  }

  pub(crate) fn push_annotation(&mut self, data: &[u8]) {
    self.annotations.push(Vec::from(data));
  }

  pub(crate) fn push_text(&mut self, data: &[u8]) {
    self.text.push(Vec::from(data));
  }

  pub(crate) fn push_color_range(&mut self, range: ColorRange) {
    self.color_ranges.push(range);
  }

  pub(crate) fn push_other(&mut self, tag: [u8; 4], data: &[u8]) {
    self.other.push(MetadataChunk { tag, data: Vec::from(data) });
  }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
  use super::*;

  #[test]
  fn empty_vault_reports_empty() {
    let v = MetadataVault::new();
    assert!(v.is_empty());
  }

  #[test]
  fn pushes_are_retained_in_order() {
    let mut v = MetadataVault::new();
    v.push_annotation(b"first");
    v.push_annotation(b"second");
    assert_eq!(v.annotations.len(), 2);
    assert_eq!(v.annotations[0], b"first");
    assert!(!v.is_empty());
  }
}
