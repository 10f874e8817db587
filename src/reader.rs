//! Big-endian primitive parsing helpers.
//!
//! IFF is entirely big-endian. These are the same shape as `imagine`'s
//! little-endian `u16_le`/`u32_le`/`try_pull_byte_array` helpers used for
//! BMP, just flipped for byte order, plus a `BeReader` cursor for the
//! header structs that have more than a couple of fields (so each field is
//! decoded one at a time, never overlaid by structure aliasing).

use crate::error::IffError;

#[inline]
#[must_use]
pub(crate) fn u16_be(bytes: &[u8]) -> u16 {
  u16::from_be_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn i16_be(bytes: &[u8]) -> i16 {
  i16::from_be_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn u32_be(bytes: &[u8]) -> u32 {
  u32::from_be_bytes(bytes.try_into().unwrap())
}

#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> Result<([u8; N], &[u8]), IffError> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().unwrap();
    Ok((a, tail))
  } else {
    Err(IffError::TruncatedChunkPayload)
  }
}

/// A small forward-only cursor over a header's byte slice.
///
/// Each `get_*` call advances the cursor and returns the field. Using this
/// instead of casting the whole slice to a `#[repr(C)]` struct is what
/// keeps the parse correct regardless of what padding a compiler would
/// otherwise insert.
pub(crate) struct BeReader<'b> {
  bytes: &'b [u8],
}
impl<'b> BeReader<'b> {
  #[inline]
  pub(crate) const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes }
  }

  #[inline]
  pub(crate) fn remaining(&self) -> usize {
    self.bytes.len()
  }

  #[inline]
  pub(crate) fn get_u8(&mut self) -> Result<u8, IffError> {
    let (a, rest) = try_pull_byte_array::<1>(self.bytes)?;
    self.bytes = rest;
    Ok(a[0])
  }

  #[inline]
  pub(crate) fn get_u16(&mut self) -> Result<u16, IffError> {
    let (a, rest) = try_pull_byte_array::<2>(self.bytes)?;
    self.bytes = rest;
    Ok(u16::from_be_bytes(a))
  }

  #[inline]
  pub(crate) fn get_i16(&mut self) -> Result<i16, IffError> {
    let (a, rest) = try_pull_byte_array::<2>(self.bytes)?;
    self.bytes = rest;
    Ok(i16::from_be_bytes(a))
  }

  #[inline]
  pub(crate) fn get_u32(&mut self) -> Result<u32, IffError> {
    let (a, rest) = try_pull_byte_array::<4>(self.bytes)?;
    self.bytes = rest;
    Ok(u32::from_be_bytes(a))
  }

  #[inline]
  pub(crate) fn skip(&mut self, n: usize) -> Result<(), IffError> {
    if self.bytes.len() < n {
      return Err(IffError::TruncatedChunkPayload);
    }
    self.bytes = &self.bytes[n..];
    Ok(())
  }
}
