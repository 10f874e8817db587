//! The image handle: the central entity threaded through parsing and
//! decoding, and sole owner of every buffer it produces.

use crate::error::{ErrorCode, IffError};
use crate::headers::{BitmapHeader, DeepChange, DeepElements, DeepGlobal, DeepLocation, FaxHeader, Palette, TvdcTable, ViewportMode, YuvHeader};
use crate::metadata::MetadataVault;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Which of the eight supported FORM types this handle holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
  Ilbm,
  Pbm,
  Acbm,
  Rgbn,
  Rgb8,
  Deep,
  Faxx,
  Yuvn,
}

impl FormKind {
  pub(crate) fn from_tag(tag: [u8; 4]) -> Result<Self, IffError> {
    match &tag {
      b"ILBM" => Ok(FormKind::Ilbm),
      b"PBM " => Ok(FormKind::Pbm),
      b"ACBM" => Ok(FormKind::Acbm),
      b"RGBN" => Ok(FormKind::Rgbn),
      b"RGB8" => Ok(FormKind::Rgb8),
      b"DEEP" => Ok(FormKind::Deep),
      b"FAXX" => Ok(FormKind::Faxx),
      b"YUVN" => Ok(FormKind::Yuvn),
      _ => Err(IffError::UnknownFormType),
    }
  }
}

/// Exactly one of a bitmap, fax, or YUV header — §3's "exactly one of"
/// requirement realized as a closed enum rather than three optional
/// fields.
#[derive(Debug, Clone, Copy)]
pub enum PrimaryHeader {
  Bitmap(BitmapHeader),
  Fax(FaxHeader),
  Yuv(YuvHeader),
}

/// The optional DEEP-specific sub-records, present only for `FORM DEEP`.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct DeepRecords {
  pub global: DeepGlobal,
  pub elements: DeepElements,
  pub location: Option<DeepLocation>,
  pub change: Option<DeepChange>,
  pub tvdc: Option<TvdcTable>,
}

/// The decoded raster: row-major top-row-first pixels, 3 bytes (RGB) or 4
/// bytes (RGBA) per pixel depending on `has_alpha`.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct DecodedRaster {
  pub width: u32,
  pub height: u32,
  pub has_alpha: bool,
  pub pixels: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl DecodedRaster {
  #[must_use]
  pub fn bytes_per_pixel(&self) -> usize {
    if self.has_alpha {
      4
    } else {
      3
    }
  }
}

/// Post-decode classification flags (§4.5).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyserFlags {
  pub is_ham: bool,
  pub is_ehb: bool,
  pub is_compressed: bool,
  pub is_indexed: bool,
  pub is_grayscale: bool,
  pub has_alpha: bool,
}

/// The central decoding handle. Created empty by [`ImageHandle::parse`];
/// the raster and palette-index shadow are populated by
/// [`ImageHandle::decode`]. Not concurrently shared — see the crate's
/// concurrency notes.
#[cfg(feature = "alloc")]
pub struct ImageHandle<'b> {
  pub(crate) form_type: [u8; 4],
  pub(crate) form_kind: FormKind,
  pub(crate) header: PrimaryHeader,
  pub(crate) viewport: Option<ViewportMode>,
  pub(crate) palette: Option<Palette>,
  pub(crate) deep: Option<DeepRecords>,
  pub(crate) metadata: Option<MetadataVault>,

  pub(crate) data_chunk: &'b [u8],
  pub(crate) datu: Option<&'b [u8]>,
  pub(crate) datv: Option<&'b [u8]>,
  pub(crate) data_alpha: Option<&'b [u8]>,

  raster: Option<DecodedRaster>,
  palette_index_shadow: Option<Vec<u8>>,
  analyser: AnalyserFlags,

  is_loaded: bool,
  is_decoded: bool,
  partial_decode: bool,
  last_error: Option<IffError>,
}

#[cfg(feature = "alloc")]
impl<'b> ImageHandle<'b> {
  pub(crate) fn new(
    form_type: [u8; 4],
    form_kind: FormKind,
    header: PrimaryHeader,
    viewport: Option<ViewportMode>,
    palette: Option<Palette>,
    deep: Option<DeepRecords>,
    metadata: Option<MetadataVault>,
    data_chunk: &'b [u8],
    datu: Option<&'b [u8]>,
    datv: Option<&'b [u8]>,
    data_alpha: Option<&'b [u8]>,
  ) -> Self {
    Self {
      form_type,
      form_kind,
      header,
      viewport,
      palette,
      deep,
      metadata,
      data_chunk,
      datu,
      datv,
      data_alpha,
      raster: None,
      palette_index_shadow: None,
      analyser: AnalyserFlags::default(),
      is_loaded: true,
      is_decoded: false,
      partial_decode: false,
      last_error: None,
    }
  }

  #[must_use]
  pub fn form_type(&self) -> [u8; 4] {
    self.form_type
  }

  #[must_use]
  pub fn form_kind(&self) -> FormKind {
    self.form_kind
  }

  #[must_use]
  pub fn header(&self) -> &PrimaryHeader {
    &self.header
  }

  #[must_use]
  pub fn palette(&self) -> Option<&Palette> {
    self.palette.as_ref()
  }

  #[must_use]
  pub fn metadata(&self) -> Option<&MetadataVault> {
    self.metadata.as_ref()
  }

  #[must_use]
  pub fn raster(&self) -> Option<&DecodedRaster> {
    self.raster.as_ref()
  }

  #[must_use]
  pub fn palette_index_shadow(&self) -> Option<&[u8]> {
    self.palette_index_shadow.as_deref()
  }

  #[must_use]
  pub fn analyser_flags(&self) -> AnalyserFlags {
    self.analyser
  }

  #[must_use]
  pub fn is_loaded(&self) -> bool {
    self.is_loaded
  }

  #[must_use]
  pub fn is_decoded(&self) -> bool {
    self.is_decoded
  }

  /// Set when a FAXX MH/MR bit-stream error forced the remainder of the
  /// raster to be filled with white rather than failing the decode.
  #[must_use]
  pub fn partial_decode(&self) -> bool {
    self.partial_decode
  }

  /// The external five-code contract (§6): `Ok` unless an error is
  /// latched.
  #[must_use]
  pub fn error_code(&self) -> ErrorCode {
    self.last_error.map_or(ErrorCode::Ok, IffError::code)
  }

  #[must_use]
  pub fn last_error(&self) -> Option<IffError> {
    self.last_error
  }

  /// Runs the format decoder selected by [`crate::dispatch`], populating
  /// the raster and (for indexed formats) the palette-index shadow.
  ///
  /// Latches and returns [`IffError::AlreadyDecoded`] on a second call, and
  /// short-circuits with the already-latched error if one is set — §7's
  /// "first error is latched, no reset".
  pub fn decode(&mut self) -> Result<(), IffError> {
    if let Some(e) = self.last_error {
      return Err(e);
    }
    if self.is_decoded {
      self.last_error = Some(IffError::AlreadyDecoded);
      return Err(IffError::AlreadyDecoded);
    }
    match crate::dispatch::decode(self) {
      Ok(outcome) => {
        self.raster = Some(outcome.raster);
        self.palette_index_shadow = outcome.palette_index_shadow;
        self.analyser = outcome.analyser;
        self.partial_decode = outcome.partial_decode;
        self.is_decoded = true;
        Ok(())
      }
      Err(e) => {
        self.last_error = Some(e);
        Err(e)
      }
    }
  }
}

/// What a format decoder hands back to [`ImageHandle::decode`] before it's
/// folded into the handle's own fields.
#[cfg(feature = "alloc")]
pub(crate) struct DecodeOutcome {
  pub(crate) raster: DecodedRaster,
  pub(crate) palette_index_shadow: Option<Vec<u8>>,
  pub(crate) analyser: AnalyserFlags,
  pub(crate) partial_decode: bool,
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
  use super::*;

  #[test]
  fn form_kind_from_known_tags() {
    assert_eq!(FormKind::from_tag(*b"ILBM").unwrap(), FormKind::Ilbm);
    assert_eq!(FormKind::from_tag(*b"FAXX").unwrap(), FormKind::Faxx);
  }

  #[test]
  fn unknown_tag_is_unsupported_form_type() {
    assert!(matches!(FormKind::from_tag(*b"WOOT"), Err(IffError::UnknownFormType)));
  }
}
