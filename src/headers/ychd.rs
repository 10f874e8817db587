//! `YCHD` — the YUVN header.

use crate::error::{IffError, RequiredProperty};
use crate::reader::BeReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YuvSubsampling {
  /// Mode 0/8: full resolution chroma.
  Mode444,
  /// Mode 1/9: horizontal-only 2:1 chroma decimation.
  Mode422,
  /// Mode 2/10: horizontal and vertical 2:1 chroma decimation.
  Mode411,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvNorm {
  Ntsc,
  Pal,
  Secam,
}
impl TvNorm {
  const fn from_u8(v: u8) -> Result<Self, IffError> {
    match v {
      0 => Ok(TvNorm::Ntsc),
      1 => Ok(TvNorm::Pal),
      2 => Ok(TvNorm::Secam),
      _ => Err(IffError::BadBitmapHeader),
    }
  }
}

/// The parsed `YCHD` chunk: 24 bytes.
#[derive(Debug, Clone, Copy)]
pub struct YuvHeader {
  pub width: u16,
  pub height: u16,
  pub page_width: u16,
  pub page_height: u16,
  pub left_edge: u16,
  pub top_edge: u16,
  pub aspect_x: u8,
  pub aspect_y: u8,
  pub compress: u8,
  pub flags: u8,
  pub mode: u8,
  pub norm: TvNorm,
}

impl YuvHeader {
  pub fn parse(data: &[u8]) -> Result<Self, IffError> {
    if data.len() < 24 {
      return Err(IffError::UndersizedProperty(RequiredProperty::Ychd));
    }
    let mut r = BeReader::new(data);
    let width = r.get_u16()?;
    let height = r.get_u16()?;
    let page_width = r.get_u16()?;
    let page_height = r.get_u16()?;
    let left_edge = r.get_u16()?;
    let top_edge = r.get_u16()?;
    let aspect_x = r.get_u8()?;
    let aspect_y = r.get_u8()?;
    let compress = r.get_u8()?;
    let flags = r.get_u8()?;
    let mode = r.get_u8()?;
    let norm = TvNorm::from_u8(r.get_u8()?)?;
    if width == 0 || height == 0 {
      return Err(IffError::BadBitmapHeader);
    }
    Ok(Self { width, height, page_width, page_height, left_edge, top_edge, aspect_x, aspect_y, compress, flags, mode, norm })
  }

  /// Interlaced per the `flags` field's bit 0, per the `DLOC`/`YCHD`
  /// convention shared with the other planar formats.
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    self.flags & 0x01 != 0
  }

  #[must_use]
  pub fn subsampling(&self) -> Result<YuvSubsampling, IffError> {
    match self.mode {
      0 | 8 => Ok(YuvSubsampling::Mode444),
      1 | 9 => Ok(YuvSubsampling::Mode422),
      2 | 10 => Ok(YuvSubsampling::Mode411),
      3 => Err(IffError::UnsupportedYuvnCompression),
      _ => Err(IffError::BadBitmapHeader),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> [u8; 24] {
    let mut b = [0u8; 24];
    b[0..2].copy_from_slice(&4u16.to_be_bytes());
    b[2..4].copy_from_slice(&4u16.to_be_bytes());
    b[20] = 0; // mode 444
    b[21] = 0; // norm NTSC
    b
  }

  #[test]
  fn parses_minimal_header() {
    let b = sample();
    let h = YuvHeader::parse(&b).unwrap();
    assert_eq!(h.width, 4);
    assert_eq!(h.subsampling().unwrap(), YuvSubsampling::Mode444);
    assert_eq!(h.norm, TvNorm::Ntsc);
  }

  #[test]
  fn mode_411_is_recognised() {
    let mut b = sample();
    b[20] = 2;
    let h = YuvHeader::parse(&b).unwrap();
    assert_eq!(h.subsampling().unwrap(), YuvSubsampling::Mode411);
  }
}
