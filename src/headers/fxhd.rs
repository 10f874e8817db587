//! `FXHD` — the FAXX page header.

use crate::error::{IffError, RequiredProperty};
use crate::reader::BeReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaxCompression {
  None,
  Mh,
  Mr,
  Mmr,
}
impl FaxCompression {
  const fn from_u8(v: u8) -> Result<Self, IffError> {
    match v {
      0 => Ok(FaxCompression::None),
      1 => Ok(FaxCompression::Mh),
      2 => Ok(FaxCompression::Mr),
      4 => Ok(FaxCompression::Mmr),
      _ => Err(IffError::BadBitmapHeader),
    }
  }
}

/// The parsed `FXHD` chunk: 20 bytes, 11 of which are padding.
#[derive(Debug, Clone, Copy)]
pub struct FaxHeader {
  pub width: u16,
  pub height: u16,
  pub line_length: u16,
  pub v_res: u16,
  pub compression: FaxCompression,
}

impl FaxHeader {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    if data.len() < 20 {
      return Err(IffError::UndersizedProperty(RequiredProperty::Fxhd));
    }
    let mut r = BeReader::new(data);
    let width = r.get_u16()?;
    let height = r.get_u16()?;
    let line_length = r.get_u16()?;
    let v_res = r.get_u16()?;
    let compression = FaxCompression::from_u8(r.get_u8()?)?;
    if width == 0 || height == 0 {
      return Err(IffError::BadBitmapHeader);
    }
    Ok(Self { width, height, line_length, v_res, compression })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_header_and_ignores_padding() {
    let mut b = [0u8; 20];
    b[0..2].copy_from_slice(&8u16.to_be_bytes());
    b[2..4].copy_from_slice(&2u16.to_be_bytes());
    b[8] = 1; // MH
    let h = FaxHeader::parse(&b).unwrap();
    assert_eq!(h.width, 8);
    assert_eq!(h.height, 2);
    assert_eq!(h.compression, FaxCompression::Mh);
  }

  #[test]
  fn rejects_unknown_compression_byte() {
    let mut b = [0u8; 20];
    b[0..2].copy_from_slice(&8u16.to_be_bytes());
    b[2..4].copy_from_slice(&2u16.to_be_bytes());
    b[8] = 3;
    assert!(FaxHeader::parse(&b).is_err());
  }
}
