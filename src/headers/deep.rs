//! DEEP's header family: `DGBL`, `DPEL`, `DLOC`, `DCHG`, `TVDC`.
//!
//! `DLOC`, `DCHG`, and `TVDC` are parsed into records (so well-formed files
//! with these chunks don't fail to parse) but never consulted at decode
//! time, matching the distilled animation/colour-compensation extensions
//! this core doesn't act on.

use crate::error::{IffError, RequiredProperty};
use crate::reader::BeReader;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepCompression {
  None,
  ByteRun1,
  Unsupported(u16),
}
impl DeepCompression {
  const fn from_u16(v: u16) -> Self {
    match v {
      0 => DeepCompression::None,
      1 => DeepCompression::ByteRun1,
      other => DeepCompression::Unsupported(other),
    }
  }
}

/// The parsed `DGBL` chunk: 8 bytes.
#[derive(Debug, Clone, Copy)]
pub struct DeepGlobal {
  pub display_width: u16,
  pub display_height: u16,
  pub compression: DeepCompression,
  pub x_aspect: u8,
  pub y_aspect: u8,
}

impl DeepGlobal {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    if data.len() < 8 {
      return Err(IffError::UndersizedProperty(RequiredProperty::Dgbl));
    }
    let mut r = BeReader::new(data);
    let display_width = r.get_u16()?;
    let display_height = r.get_u16()?;
    let compression = DeepCompression::from_u16(r.get_u16()?);
    let x_aspect = r.get_u8()?;
    let y_aspect = r.get_u8()?;
    if display_width == 0 || display_height == 0 {
      return Err(IffError::BadBitmapHeader);
    }
    Ok(Self { display_width, display_height, compression, x_aspect, y_aspect })
  }
}

/// One of `DPEL`'s per-channel element descriptors.
#[derive(Debug, Clone, Copy)]
pub struct DeepElement {
  pub c_type: u16,
  pub c_bit_depth: u16,
}

/// The parsed `DPEL` chunk: a `u32` count followed by that many
/// `{cType, cBitDepth}` pairs.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct DeepElements {
  pub elements: Vec<DeepElement>,
}

#[cfg(feature = "alloc")]
impl DeepElements {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    let mut r = BeReader::new(data);
    let count = r.get_u32()? as usize;
    let mut elements = Vec::new();
    elements.try_reserve(count)?;
    for _ in 0..count {
      let c_type = r.get_u16()?;
      let c_bit_depth = r.get_u16()?;
      elements.push(DeepElement { c_type, c_bit_depth });
    }
    if elements.is_empty() {
      return Err(IffError::MissingRequiredProperty(RequiredProperty::Dpel));
    }
    Ok(Self { elements })
  }

  #[must_use]
  pub fn total_planes(&self) -> u32 {
    self.elements.iter().map(|e| e.c_bit_depth as u32).sum()
  }
}

/// `DLOC` — animation frame placement. Parsed, never acted on.
#[derive(Debug, Clone, Copy)]
pub struct DeepLocation {
  pub width: u16,
  pub height: u16,
  pub x: i16,
  pub y: i16,
}
impl DeepLocation {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    if data.len() < 8 {
      return Err(IffError::UndersizedProperty(RequiredProperty::Dgbl));
    }
    let mut r = BeReader::new(data);
    Ok(Self { width: r.get_u16()?, height: r.get_u16()?, x: r.get_i16()?, y: r.get_i16()? })
  }
}

/// `DCHG` — animation change record. Parsed, never acted on.
#[derive(Debug, Clone, Copy)]
pub struct DeepChange {
  pub flags: u32,
}
impl DeepChange {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    let mut r = BeReader::new(data);
    Ok(Self { flags: r.get_u32()? })
  }
}

/// `TVDC` — TVPaint colour-compensation table. Parsed, never acted on.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct TvdcTable {
  pub entries: Vec<i16>,
}
#[cfg(feature = "alloc")]
impl TvdcTable {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    let mut r = BeReader::new(data);
    let mut entries = Vec::new();
    while r.remaining() >= 2 {
      entries.push(r.get_i16()?);
    }
    Ok(Self { entries })
  }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
  use super::*;

  #[test]
  fn parses_dgbl() {
    let mut b = [0u8; 8];
    b[0..2].copy_from_slice(&4u16.to_be_bytes());
    b[2..4].copy_from_slice(&4u16.to_be_bytes());
    let g = DeepGlobal::parse(&b).unwrap();
    assert_eq!(g.display_width, 4);
    assert_eq!(g.compression, DeepCompression::None);
  }

  #[test]
  fn parses_dpel_elements() {
    let mut b = Vec::new();
    b.extend_from_slice(&3u32.to_be_bytes());
    for _ in 0..3 {
      b.extend_from_slice(&0u16.to_be_bytes());
      b.extend_from_slice(&8u16.to_be_bytes());
    }
    let e = DeepElements::parse(&b).unwrap();
    assert_eq!(e.elements.len(), 3);
    assert_eq!(e.total_planes(), 24);
  }

  #[test]
  fn unsupported_compression_is_recorded_not_rejected() {
    let mut b = [0u8; 8];
    b[0..2].copy_from_slice(&4u16.to_be_bytes());
    b[2..4].copy_from_slice(&4u16.to_be_bytes());
    b[4..6].copy_from_slice(&5u16.to_be_bytes());
    let g = DeepGlobal::parse(&b).unwrap();
    assert_eq!(g.compression, DeepCompression::Unsupported(5));
  }
}
