//! Modified READ (2D) line decoding, referencing the previous line's
//! changing elements.

use crate::bitstream::BitReader;
use crate::error::IffError;
use crate::formats::faxx::mh::{read_run_length, Color};

/// Vertical-mode codes (§4.4.9): `V0` is 1 bit, `VR/VL1` are 3 bits,
/// `VR/VL2` are 6 bits, `VR/VL3` are 7 bits; `H` is `001`, `P` is `0001`.
enum Op {
  Vertical(i32),
  Horizontal,
  Pass,
}

fn read_mode_code(reader: &mut BitReader<'_>) -> Result<Op, IffError> {
  // V0: 1
  if reader.peek_bits(1) == Some(0b1) {
    reader.skip_bits(1)?;
    return Ok(Op::Vertical(0));
  }
  // VR1: 011, VL1: 010
  if let Some(three) = reader.peek_bits(3) {
    match three {
      0b011 => {
        reader.skip_bits(3)?;
        return Ok(Op::Vertical(1));
      }
      0b010 => {
        reader.skip_bits(3)?;
        return Ok(Op::Vertical(-1));
      }
      0b001 => {
        reader.skip_bits(3)?;
        return Ok(Op::Horizontal);
      }
      _ => {}
    }
  }
  // P: 0001
  if reader.peek_bits(4) == Some(0b0001) {
    reader.skip_bits(4)?;
    return Ok(Op::Pass);
  }
  // VR2: 000011, VL2: 000010
  if let Some(six) = reader.peek_bits(6) {
    match six {
      0b000011 => {
        reader.skip_bits(6)?;
        return Ok(Op::Vertical(2));
      }
      0b000010 => {
        reader.skip_bits(6)?;
        return Ok(Op::Vertical(-2));
      }
      _ => {}
    }
  }
  // VR3: 0000011, VL3: 0000010
  if let Some(seven) = reader.peek_bits(7) {
    match seven {
      0b0000011 => {
        reader.skip_bits(7)?;
        return Ok(Op::Vertical(3));
      }
      0b0000010 => {
        reader.skip_bits(7)?;
        return Ok(Op::Vertical(-3));
      }
      _ => {}
    }
  }
  Err(IffError::FaxxStreamExhausted)
}

/// Finds `b1`: the first changing element in `reference` strictly to the
/// right of `a0` whose colour is the opposite of `current_color`.
/// `reference` holds changing-element positions in increasing order,
/// alternating colour starting with white-to-black at index 0.
fn find_b1(reference: &[u32], a0: i64, current_color: Color) -> u32 {
  for (i, &pos) in reference.iter().enumerate() {
    if (pos as i64) > a0 {
      // Element i transitions into the colour opposite of white iff i is
      // even (reference[0] is the first white->black transition).
      let elem_color = if i % 2 == 0 { Color::Black } else { Color::White };
      if elem_color != current_color {
        return pos;
      }
    }
  }
  u32::MAX
}

fn find_b2(reference: &[u32], b1: u32) -> u32 {
  reference.iter().copied().find(|&pos| pos > b1).unwrap_or(u32::MAX)
}

/// Decodes one MR-coded row given the previous row's changing-element
/// list, filling `out` and returning this row's own changing elements (for
/// use as the next row's reference).
pub(crate) fn decode_row(
  reader: &mut BitReader<'_>,
  width: u32,
  reference: &[u32],
  out: &mut [u8],
) -> Result<alloc::vec::Vec<u32>, IffError> {
  debug_assert_eq!(out.len(), width as usize);
  let mut changes = alloc::vec::Vec::new();
  let mut a0: i64 = -1;
  let mut color = Color::White;
  loop {
    if a0 >= width as i64 {
      break;
    }
    match read_mode_code(reader)? {
      Op::Pass => {
        let b1 = find_b1(reference, a0, color);
        let b2 = find_b2(reference, b1);
        let end = (b2 as i64).min(width as i64).max(0) as usize;
        let start = a0.max(0) as usize;
        let fill = if color == Color::White { 0u8 } else { 1u8 };
        out[start..end].fill(fill);
        a0 = b2 as i64;
      }
      Op::Horizontal => {
        let run1 = read_mh_run(reader, color)? as i64;
        let run2 = read_mh_run(reader, color.toggled())? as i64;
        let start1 = a0.max(0) as usize;
        let end1 = (start1 as i64 + run1).min(width as i64).max(0) as usize;
        let fill1 = if color == Color::White { 0u8 } else { 1u8 };
        out[start1..end1].fill(fill1);
        let start2 = end1;
        let end2 = (start2 as i64 + run2).min(width as i64).max(0) as usize;
        let fill2 = if color == Color::White { 1u8 } else { 0u8 };
        out[start2..end2].fill(fill2);
        changes.push(end1 as u32);
        changes.push(end2 as u32);
        a0 = end2 as i64;
      }
      Op::Vertical(delta) => {
        let b1 = find_b1(reference, a0, color);
        let a1 = (b1 as i64 + delta as i64).clamp(0, width as i64) as u32;
        let start = a0.max(0) as usize;
        let end = (a1 as usize).min(width as usize);
        let fill = if color == Color::White { 0u8 } else { 1u8 };
        out[start..end].fill(fill);
        changes.push(a1);
        a0 = a1 as i64;
        color = color.toggled();
      }
    }
  }
  Ok(changes)
}

fn read_mh_run(reader: &mut BitReader<'_>, color: Color) -> Result<u32, IffError> {
  read_run_length(reader, color)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vertical_v0_toggles_at_reference_position() {
    // Reference line: single transition at column 4 (white->black).
    let reference = alloc::vec![4u32];
    // V0 code: bit "1".
    let bytes = [0b1000_0000u8];
    let mut reader = BitReader::new(&bytes);
    let mut out = [0u8; 8];
    let changes = decode_row(&mut reader, 8, &reference, &mut out).unwrap();
    assert_eq!(&out[..4], &[0u8; 4]);
    assert_eq!(changes[0], 4);
  }
}
