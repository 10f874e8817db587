//! Error types for the decoding core.
//!
//! The crate's "native" Rust surface returns `Result<_, IffError>` from
//! every fallible function, same as the rest of the `imagine` family
//! (`ImagineError`, `BmpError`, `PngError`). [`ImageHandle`](crate::image::ImageHandle)
//! additionally latches the most recent error and exposes it as an
//! [`ErrorCode`], matching the five stable numeric codes the external
//! contract promises callers that persist them.

use core::fmt::{self, Display};

/// The five stable error codes of the external contract.
///
/// Numeric values are part of the contract and must not change:
/// `Ok = 0`, `Error = -1`, `NoMem = -2`, `BadFile = -3`, `Unsupported = -4`,
/// `Invalid = -5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum ErrorCode {
  Ok = 0,
  Error = -1,
  NoMem = -2,
  BadFile = -3,
  Unsupported = -4,
  Invalid = -5,
}

/// The crate's unified error type.
///
/// Groups every concrete failure reason under one of the five
/// [`ErrorCode`] buckets so a handle can latch a single value while still
/// giving callers (and `Display`) the precise reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IffError {
  /// Caller precondition violated: operation attempted before `parse`, or
  /// `decode` called a second time on a handle that already decoded.
  NotParsed,
  AlreadyDecoded,
  NullOrEmptyInput,

  /// Structurally malformed input.
  NotAForm,
  UnknownFormType,
  MissingRequiredProperty(RequiredProperty),
  UndersizedProperty(RequiredProperty),
  StopChunkNotFound,
  TruncatedChunkHeader,
  TruncatedChunkPayload,
  ByteRun1Overflow,
  ByteRun1Underflow,
  BadBitmapHeader,
  PaletteIndexOutOfRange,
  PlaneCountInvalidForFormat,
  CompressionForbiddenForFormat,
  YuvnSubsamplingWidthMismatch,
  YuvnInterlaceHeightMismatch,
  /// The FAXX bit stream ran out or produced an undecodable code mid-row.
  /// Never returned to a caller: the FAXX decoder catches this internally,
  /// pads the remaining raster with white, and sets `partial_decode`.
  FaxxStreamExhausted,

  /// Well-formed input this core doesn't decode.
  UnsupportedFormType,
  UnsupportedDeepCompression,
  UnsupportedFaxxCompression,
  UnsupportedYuvnCompression,

  /// Allocation could not be satisfied.
  OutOfMemory,
}

/// Which required property chunk a [`IffError`] concerns, for the
/// `MissingRequiredProperty`/`UndersizedProperty` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RequiredProperty {
  Bmhd,
  Cmap,
  Fxhd,
  Ychd,
  Dgbl,
  Dpel,
}

impl IffError {
  /// Maps this error onto the stable external [`ErrorCode`].
  #[inline]
  #[must_use]
  pub const fn code(self) -> ErrorCode {
    use IffError::*;
    match self {
      NotParsed | AlreadyDecoded | NullOrEmptyInput => ErrorCode::Invalid,
      OutOfMemory => ErrorCode::NoMem,
      UnsupportedFormType
      | UnsupportedDeepCompression
      | UnsupportedFaxxCompression
      | UnsupportedYuvnCompression => ErrorCode::Unsupported,
      NotAForm
      | UnknownFormType
      | MissingRequiredProperty(_)
      | UndersizedProperty(_)
      | StopChunkNotFound
      | TruncatedChunkHeader
      | TruncatedChunkPayload
      | ByteRun1Overflow
      | ByteRun1Underflow
      | BadBitmapHeader
      | PaletteIndexOutOfRange
      | PlaneCountInvalidForFormat
      | CompressionForbiddenForFormat
      | YuvnSubsamplingWidthMismatch
      | YuvnInterlaceHeightMismatch
      | FaxxStreamExhausted => ErrorCode::BadFile,
    }
  }
}

impl Display for IffError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use IffError::*;
    match self {
      NotParsed => write!(f, "operation attempted before parse"),
      AlreadyDecoded => write!(f, "handle already decoded"),
      NullOrEmptyInput => write!(f, "input is empty"),
      NotAForm => write!(f, "input does not start with a FORM chunk"),
      UnknownFormType => write!(f, "unrecognized FORM type tag"),
      MissingRequiredProperty(p) => write!(f, "missing required property chunk: {p:?}"),
      UndersizedProperty(p) => write!(f, "property chunk too small for its fixed layout: {p:?}"),
      StopChunkNotFound => write!(f, "principal data chunk never appeared"),
      TruncatedChunkHeader => write!(f, "chunk header truncated"),
      TruncatedChunkPayload => write!(f, "chunk payload shorter than its declared length"),
      ByteRun1Overflow => write!(f, "ByteRun1 stream emitted more bytes than requested"),
      ByteRun1Underflow => write!(f, "ByteRun1 stream exhausted before requested length"),
      BadBitmapHeader => write!(f, "bitmap header violates a format invariant"),
      PaletteIndexOutOfRange => write!(f, "palette index exceeds palette length"),
      PlaneCountInvalidForFormat => write!(f, "bitplane count invalid for this format"),
      CompressionForbiddenForFormat => write!(f, "compression set on a format that forbids it"),
      YuvnSubsamplingWidthMismatch => write!(f, "width incompatible with YUVN subsampling mode"),
      YuvnInterlaceHeightMismatch => write!(f, "height is odd on an interlaced YUVN image"),
      FaxxStreamExhausted => write!(f, "FAXX bit stream ended before the row was fully decoded"),
      UnsupportedFormType => write!(f, "FORM type is not one of the eight supported formats"),
      UnsupportedDeepCompression => write!(f, "DEEP compression submode is not decoded"),
      UnsupportedFaxxCompression => write!(f, "FAXX compression submode is not decoded"),
      UnsupportedYuvnCompression => write!(f, "compressed YUVN is not decoded"),
      OutOfMemory => write!(f, "allocation failed"),
    }
  }
}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for IffError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    IffError::OutOfMemory
  }
}

pub type IffResult<T> = Result<T, IffError>;
