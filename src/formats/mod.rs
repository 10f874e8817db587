//! The eight per-FORM-type pixel decoders, each consuming decoded headers
//! plus the principal data chunk's bytes and emitting a raster into the
//! canonical image buffer.

pub(crate) mod acbm;
pub(crate) mod deep;
pub(crate) mod faxx;
pub(crate) mod ilbm;
pub(crate) mod pbm;
pub(crate) mod rgb8;
pub(crate) mod rgbn;
pub(crate) mod yuvn;

use crate::byterun1::byterun1_decode;
use crate::error::IffError;
use crate::headers::BitmapCompression;
use alloc::vec;
use alloc::vec::Vec;

/// Produces `total_len` raw bytes from a data chunk body, applying
/// ByteRun1 if the header demands it. Shared by ILBM, PBM, RGBN, and RGB8
/// (ACBM forbids compression entirely and DEEP has its own compression
/// enum, so they call [`byterun1_decode`] directly where needed).
pub(crate) fn materialize(body: &[u8], compression: BitmapCompression, total_len: usize) -> Result<Vec<u8>, IffError> {
  match compression {
    BitmapCompression::None => {
      if body.len() < total_len {
        return Err(IffError::TruncatedChunkPayload);
      }
      Ok(Vec::from(&body[..total_len]))
    }
    BitmapCompression::ByteRun1 => {
      let mut out = vec![0u8; total_len];
      byterun1_decode(body, &mut out)?;
      Ok(out)
    }
  }
}

/// Decompresses a ByteRun1 stream to `total_len` bytes, for formats (DEEP)
/// whose compression enum isn't [`BitmapCompression`].
pub(crate) fn materialize_byterun1(body: &[u8], total_len: usize) -> Result<Vec<u8>, IffError> {
  let mut out = vec![0u8; total_len];
  byterun1_decode(body, &mut out)?;
  Ok(out)
}

/// The shared output of every format decoder: a row-major RGB(A) raster
/// plus, for the formats that are genuinely palette-indexed in their PNG
/// output (plain ILBM, PBM, ACBM), a parallel palette-index shadow.
pub(crate) struct DecodeOutput {
  pub(crate) pixels: Vec<u8>,
  pub(crate) has_alpha: bool,
  pub(crate) palette_index_shadow: Option<Vec<u8>>,
  pub(crate) partial_decode: bool,
}
