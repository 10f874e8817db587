//! `BMHD` — the bitmap header shared by ILBM, PBM, ACBM, RGBN, and RGB8.

use crate::error::{IffError, RequiredProperty};
use crate::reader::BeReader;

/// `masking` field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Masking {
  None,
  HasMask,
  HasTransparentColor,
  Lasso,
}
impl Masking {
  const fn from_u8(v: u8) -> Result<Self, IffError> {
    match v {
      0 => Ok(Masking::None),
      1 => Ok(Masking::HasMask),
      2 => Ok(Masking::HasTransparentColor),
      3 => Ok(Masking::Lasso),
      _ => Err(IffError::BadBitmapHeader),
    }
  }
}

/// `compression` field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapCompression {
  None,
  ByteRun1,
}
impl BitmapCompression {
  const fn from_u8(v: u8) -> Result<Self, IffError> {
    match v {
      0 => Ok(BitmapCompression::None),
      1 => Ok(BitmapCompression::ByteRun1),
      _ => Err(IffError::BadBitmapHeader),
    }
  }
}

/// The parsed `BMHD` chunk: 20 bytes, all big-endian.
#[derive(Debug, Clone, Copy)]
pub struct BitmapHeader {
  pub width: u16,
  pub height: u16,
  pub x_origin: i16,
  pub y_origin: i16,
  pub n_planes: u8,
  pub masking: Masking,
  pub compression: BitmapCompression,
  pub transparent_color: u16,
  pub x_aspect: u8,
  pub y_aspect: u8,
  pub page_width: i16,
  pub page_height: i16,
}

impl BitmapHeader {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    if data.len() < 20 {
      return Err(IffError::UndersizedProperty(RequiredProperty::Bmhd));
    }
    let mut r = BeReader::new(data);
    let width = r.get_u16()?;
    let height = r.get_u16()?;
    let x_origin = r.get_i16()?;
    let y_origin = r.get_i16()?;
    let n_planes = r.get_u8()?;
    let masking = Masking::from_u8(r.get_u8()?)?;
    let compression = BitmapCompression::from_u8(r.get_u8()?)?;
    r.skip(1)?; // pad
    let transparent_color = r.get_u16()?;
    let x_aspect = r.get_u8()?;
    let y_aspect = r.get_u8()?;
    let page_width = r.get_i16()?;
    let page_height = r.get_i16()?;
    if width == 0 || height == 0 {
      return Err(IffError::BadBitmapHeader);
    }
    Ok(Self {
      width,
      height,
      x_origin,
      y_origin,
      n_planes,
      masking,
      compression,
      transparent_color,
      x_aspect,
      y_aspect,
      page_width,
      page_height,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> [u8; 20] {
    let mut b = [0u8; 20];
    b[0..2].copy_from_slice(&2u16.to_be_bytes());
    b[2..4].copy_from_slice(&2u16.to_be_bytes());
    b[8] = 1; // nPlanes
    b[9] = 0; // masking
    b[10] = 0; // compression
    b
  }

  #[test]
  fn parses_minimal_header() {
    let bytes = sample();
    let h = BitmapHeader::parse(&bytes).unwrap();
    assert_eq!(h.width, 2);
    assert_eq!(h.height, 2);
    assert_eq!(h.n_planes, 1);
    assert_eq!(h.masking, Masking::None);
  }

  #[test]
  fn zero_dimensions_rejected() {
    let mut bytes = sample();
    bytes[0..2].copy_from_slice(&0u16.to_be_bytes());
    assert!(BitmapHeader::parse(&bytes).is_err());
  }

  #[test]
  fn undersized_is_rejected() {
    assert!(BitmapHeader::parse(&[0u8; 10]).is_err());
  }

  #[test]
  fn bad_masking_byte_is_rejected() {
    let mut bytes = sample();
    bytes[9] = 7;
    assert!(BitmapHeader::parse(&bytes).is_err());
  }
}
