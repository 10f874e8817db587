//! Picks a format decoder from the FORM type plus CAMG mode bits, and
//! folds its output into the shared [`AnalyserFlags`]/[`DecodedRaster`]
//! shape every format produces.

use crate::analyser;
use crate::error::IffError;
use crate::formats::{self, faxx};
use crate::image::{AnalyserFlags, DecodeOutcome, DecodedRaster, FormKind, ImageHandle, PrimaryHeader};
use alloc::vec::Vec;
use pixel_formats::r8g8b8_Unorm;

pub(crate) fn decode(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  match handle.form_kind {
    FormKind::Ilbm => decode_ilbm_family(handle, true),
    FormKind::Pbm => decode_ilbm_family(handle, false),
    FormKind::Acbm => decode_acbm(handle),
    FormKind::Rgbn => decode_rgbn(handle),
    FormKind::Rgb8 => decode_rgb8(handle),
    FormKind::Deep => decode_deep(handle),
    FormKind::Faxx => decode_faxx(handle),
    FormKind::Yuvn => decode_yuvn(handle),
  }
}

fn bitmap_header(handle: &ImageHandle<'_>) -> Result<&crate::headers::BitmapHeader, IffError> {
  match &handle.header {
    PrimaryHeader::Bitmap(b) => Ok(b),
    _ => Err(IffError::BadBitmapHeader),
  }
}

fn decode_ilbm_family(handle: &ImageHandle<'_>, planar: bool) -> Result<DecodeOutcome, IffError> {
  let header = bitmap_header(handle)?;
  let out = if planar {
    formats::ilbm::decode(header, handle.palette.as_ref(), handle.viewport, handle.data_chunk)?
  } else {
    formats::pbm::decode(header, handle.palette.as_ref(), handle.data_chunk)?
  };

  let is_ham = planar && handle.viewport.is_some_and(|v| v.is_ham()) && header.n_planes >= 6;
  let is_ehb = planar && handle.viewport.is_some_and(|v| v.is_ehb()) && header.n_planes == 6;
  let is_indexed = !is_ham && !is_ehb;
  let is_grayscale = analyser::ilbm_family_is_grayscale(is_ham, is_ehb, header.n_planes, handle.palette.as_ref());
  let flags = AnalyserFlags {
    is_ham,
    is_ehb,
    is_compressed: header.compression != crate::headers::BitmapCompression::None,
    is_indexed,
    is_grayscale,
    has_alpha: out.has_alpha,
  };
  Ok(finish(out, header.width as u32, header.height as u32, flags))
}

fn decode_acbm(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let header = bitmap_header(handle)?;
  let out = formats::acbm::decode(header, handle.palette.as_ref(), handle.data_chunk)?;
  let is_grayscale = analyser::ilbm_family_is_grayscale(false, false, header.n_planes, handle.palette.as_ref());
  let flags = AnalyserFlags { is_ham: false, is_ehb: false, is_compressed: false, is_indexed: true, is_grayscale, has_alpha: false };
  Ok(finish(out, header.width as u32, header.height as u32, flags))
}

fn decode_rgbn(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let header = bitmap_header(handle)?;
  let out = formats::rgbn::decode(header, handle.data_chunk)?;
  let flags = AnalyserFlags {
    is_ham: false,
    is_ehb: false,
    is_compressed: header.compression != crate::headers::BitmapCompression::None,
    is_indexed: false,
    is_grayscale: analyser::true_color_is_grayscale(),
    has_alpha: false,
  };
  Ok(finish(out, header.width as u32, header.height as u32, flags))
}

fn decode_rgb8(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let header = bitmap_header(handle)?;
  let out = formats::rgb8::decode(header, handle.data_chunk)?;
  let flags = AnalyserFlags {
    is_ham: false,
    is_ehb: false,
    is_compressed: header.compression != crate::headers::BitmapCompression::None,
    is_indexed: false,
    is_grayscale: analyser::true_color_is_grayscale(),
    has_alpha: false,
  };
  Ok(finish(out, header.width as u32, header.height as u32, flags))
}

fn decode_deep(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let records = handle.deep.as_ref().ok_or(IffError::MissingRequiredProperty(crate::error::RequiredProperty::Dpel))?;
  let width = records.global.display_width as u32;
  let height = records.global.display_height as u32;
  let out = formats::deep::decode(width, height, &records.elements, records.global.compression, handle.data_chunk)?;
  let flags = AnalyserFlags {
    is_ham: false,
    is_ehb: false,
    is_compressed: !matches!(records.global.compression, crate::headers::DeepCompression::None),
    is_indexed: false,
    is_grayscale: analyser::true_color_is_grayscale(),
    has_alpha: false,
  };
  Ok(finish(out, width, height, flags))
}

fn decode_faxx(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let header = match &handle.header {
    PrimaryHeader::Fax(f) => f,
    _ => return Err(IffError::BadBitmapHeader),
  };
  let (indices, partial) = faxx::decode(header, handle.data_chunk)?;
  let width = header.width as u32;
  let height = header.height as u32;
  let mut pixels = Vec::new();
  pixels.try_reserve(indices.len() * 3)?;
  for &idx in &indices {
    let color: r8g8b8_Unorm = faxx::BW_PALETTE[idx as usize & 1];
    pixels.push(color.r);
    pixels.push(color.g);
    pixels.push(color.b);
  }
  let flags = AnalyserFlags {
    is_ham: false,
    is_ehb: false,
    is_compressed: !matches!(header.compression, crate::headers::FaxCompression::None),
    is_indexed: true,
    is_grayscale: analyser::faxx_is_grayscale(),
    has_alpha: false,
  };
  Ok(DecodeOutcome {
    raster: DecodedRaster { width, height, has_alpha: false, pixels },
    palette_index_shadow: Some(indices),
    analyser: flags,
    partial_decode: partial,
  })
}

fn decode_yuvn(handle: &ImageHandle<'_>) -> Result<DecodeOutcome, IffError> {
  let header = match &handle.header {
    PrimaryHeader::Yuv(y) => y,
    _ => return Err(IffError::BadBitmapHeader),
  };
  let datu = handle.datu.ok_or(IffError::TruncatedChunkPayload)?;
  let datv = handle.datv.ok_or(IffError::TruncatedChunkPayload)?;
  let out = formats::yuvn::decode(header, handle.data_chunk, datu, datv, handle.data_alpha)?;
  let flags = AnalyserFlags {
    is_ham: false,
    is_ehb: false,
    is_compressed: false,
    is_indexed: false,
    is_grayscale: analyser::true_color_is_grayscale(),
    has_alpha: out.has_alpha,
  };
  Ok(finish(out, header.width as u32, header.height as u32, flags))
}

fn finish(out: formats::DecodeOutput, width: u32, height: u32, flags: AnalyserFlags) -> DecodeOutcome {
  DecodeOutcome {
    raster: DecodedRaster { width, height, has_alpha: out.has_alpha, pixels: out.pixels },
    palette_index_shadow: out.palette_index_shadow,
    analyser: flags,
    partial_decode: out.partial_decode,
  }
}
