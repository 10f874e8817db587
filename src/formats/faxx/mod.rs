//! FAXX: ITU-T T.4 facsimile bitmaps.

mod mh;
mod mr;
mod tables;

use crate::bitstream::BitReader;
use crate::error::IffError;
use crate::headers::{FaxCompression, FaxHeader};
use crate::planes::rowbytes;
use alloc::vec;
use alloc::vec::Vec;
use pixel_formats::r8g8b8_Unorm;

/// The synthesized black/white palette FAXX always decodes against: index
/// 0 is white, index 1 is black, matching the MH/MR "0 = white" polarity.
pub(crate) const BW_PALETTE: [r8g8b8_Unorm; 2] =
  [r8g8b8_Unorm { r: 255, g: 255, b: 255 }, r8g8b8_Unorm { r: 0, g: 0, b: 0 }];

/// Decodes a FAXX `PAGE` chunk into a palette-index raster (one byte per
/// pixel, values 0 or 1) plus whether a mid-stream error forced the
/// fill-remainder-with-white recovery (the `partial_decode` flag the
/// handle surfaces).
pub(crate) fn decode(header: &FaxHeader, page: &[u8]) -> Result<(Vec<u8>, bool), IffError> {
  let width = header.width as u32;
  let height = header.height as u32;
  let mut indices = vec![0u8; (width * height) as usize];

  match header.compression {
    FaxCompression::None => {
      decode_uncompressed(width, height, page, &mut indices)?;
      Ok((indices, false))
    }
    FaxCompression::Mh => {
      let mut reader = BitReader::new(page);
      let partial = decode_mh(width, height, &mut reader, &mut indices);
      Ok((indices, partial))
    }
    FaxCompression::Mr => {
      let mut reader = BitReader::new(page);
      let partial = decode_mr(width, height, &mut reader, &mut indices);
      Ok((indices, partial))
    }
    FaxCompression::Mmr => Err(IffError::UnsupportedFaxxCompression),
  }
}

fn decode_uncompressed(width: u32, height: u32, page: &[u8], indices: &mut [u8]) -> Result<(), IffError> {
  let stride = rowbytes(width);
  for row in 0..height as usize {
    let start = row * stride;
    let end = start + stride;
    if end > page.len() {
      return Err(IffError::FaxxStreamExhausted);
    }
    let row_bytes = &page[start..end];
    let out_row = &mut indices[row * width as usize..(row + 1) * width as usize];
    for col in 0..width as usize {
      let byte = row_bytes[col >> 3];
      out_row[col] = (byte >> (7 - (col % 8))) & 1;
    }
  }
  Ok(())
}

/// Fills `indices[from_row..]` with white (index 0).
fn fill_remainder_white(indices: &mut [u8], width: u32, height: u32, from_row: usize) {
  let start = from_row * width as usize;
  let end = (height as usize) * width as usize;
  indices[start..end].fill(0);
}

/// Decodes an MH-only FAXX page: the stream begins with an EOL, then one
/// MH row per EOL. Returns whether a mid-stream error forced recovery.
fn decode_mh(width: u32, height: u32, reader: &mut BitReader<'_>, indices: &mut [u8]) -> bool {
  for row in 0..height as usize {
    let out_row = &mut indices[row * width as usize..(row + 1) * width as usize];
    let ok = reader.skip_eol().is_ok() && mh::decode_row(reader, width, out_row).is_ok();
    if !ok {
      fill_remainder_white(indices, width, height, row);
      return true;
    }
  }
  false
}

/// Decodes an MR page: line 1 is MH; each subsequent line is preceded by
/// an EOL and a 1-bit tag (0 = MH, 1 = MR), referencing the previous
/// line's changing elements.
fn decode_mr(width: u32, height: u32, reader: &mut BitReader<'_>, indices: &mut [u8]) -> bool {
  let mut reference: Vec<u32> = Vec::new();
  for row in 0..height as usize {
    let out_row = &mut indices[row * width as usize..(row + 1) * width as usize];
    let result = (|| -> Result<Vec<u32>, IffError> {
      reader.skip_eol()?;
      let is_mr_line = if row == 0 { false } else { reader.next_bit().ok_or(IffError::FaxxStreamExhausted)? == 1 };
      if is_mr_line {
        mr::decode_row(reader, width, &reference, out_row)
      } else {
        mh::decode_row(reader, width, out_row)?;
        Ok(row_changes_from_mh(out_row))
      }
    })();
    match result {
      Ok(changes) => reference = changes,
      Err(_) => {
        fill_remainder_white(indices, width, height, row);
        return true;
      }
    }
  }
  false
}

/// Derives a changing-element list from a fully decoded MH row, for use as
/// the next row's MR reference.
fn row_changes_from_mh(row: &[u8]) -> Vec<u32> {
  let mut changes = Vec::new();
  for i in 1..row.len() {
    if row[i] != row[i - 1] {
      changes.push(i as u32);
    }
  }
  changes
}

#[cfg(test)]
mod tests {
  use super::*;

  fn header(width: u16, height: u16, compression: FaxCompression) -> FaxHeader {
    FaxHeader { width, height, line_length: width, v_res: 0, compression }
  }

  #[test]
  fn uncompressed_row_unpacks_msb_first() {
    let h = header(8, 1, FaxCompression::None);
    let page = [0b1010_0000u8, 0x00]; // rowbytes(8) = 2
    let (indices, partial) = decode(&h, &page).unwrap();
    assert_eq!(indices, alloc::vec![1, 0, 1, 0, 0, 0, 0, 0]);
    assert!(!partial);
  }

  #[test]
  fn mmr_is_unsupported() {
    let h = header(8, 1, FaxCompression::Mmr);
    assert!(decode(&h, &[]).is_err());
  }

  #[test]
  fn exhausted_mh_stream_fills_white_and_reports_partial() {
    let h = header(8, 2, FaxCompression::Mh);
    let (indices, partial) = decode(&h, &[]).unwrap();
    assert!(partial);
    assert_eq!(indices, alloc::vec![0u8; 16]);
  }
}
