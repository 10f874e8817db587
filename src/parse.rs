//! Top-level orchestration: walks a `FORM` file's chunks, classifies each
//! by the registration table (§4.1), and builds an [`ImageHandle`].

use crate::chunk::FormFile;
use crate::error::{IffError, RequiredProperty};
use crate::headers::{
  BitmapHeader, DeepChange, DeepElements, DeepGlobal, DeepLocation, FaxHeader, Palette, TvdcTable, ViewportMode, YuvHeader,
};
use crate::image::{DeepRecords, FormKind, ImageHandle, PrimaryHeader};
use crate::metadata::{ColorRange, MetadataVault};
use crate::reader::BeReader;

impl<'b> ImageHandle<'b> {
  /// Parses an IFF `FORM` file: classifies every sub-chunk by the
  /// registration table for the detected FORM type, buffers required and
  /// optional property chunks, accumulates collection/metadata chunks, and
  /// stops at the principal data chunk. Does not decode pixels — see
  /// [`ImageHandle::decode`].
  pub fn parse(bytes: &'b [u8]) -> Result<Self, IffError> {
    let form = FormFile::new(bytes)?;
    let form_kind = FormKind::from_tag(form.form_type)?;

    let mut bmhd: Option<BitmapHeader> = None;
    let mut fxhd: Option<FaxHeader> = None;
    let mut ychd: Option<YuvHeader> = None;
    let mut dgbl: Option<DeepGlobal> = None;
    let mut dpel: Option<DeepElements> = None;
    let mut dloc: Option<DeepLocation> = None;
    let mut dchg: Option<DeepChange> = None;
    let mut tvdc: Option<TvdcTable> = None;
    let mut palette: Option<Palette> = None;
    let mut viewport: Option<ViewportMode> = None;
    let mut vault = MetadataVault::new();

    let mut data_chunk: Option<&'b [u8]> = None;
    let mut daty: Option<&'b [u8]> = None;
    let mut datu: Option<&'b [u8]> = None;
    let mut datv: Option<&'b [u8]> = None;
    let mut data_alpha: Option<&'b [u8]> = None;

    'chunks: for chunk in form.chunks() {
      let chunk = chunk?;
      match (&chunk.tag, form_kind) {
        (b"BMHD", FormKind::Ilbm | FormKind::Pbm | FormKind::Acbm | FormKind::Rgbn | FormKind::Rgb8) => {
          bmhd = Some(BitmapHeader::parse(chunk.data)?);
        }
        (b"CMAP", FormKind::Ilbm | FormKind::Pbm | FormKind::Acbm | FormKind::Rgbn | FormKind::Rgb8) => {
          palette = Some(Palette::parse(chunk.data)?);
        }
        (b"CAMG", FormKind::Ilbm | FormKind::Pbm | FormKind::Acbm) => {
          viewport = ViewportMode::parse(chunk.data);
        }
        (b"FXHD", FormKind::Faxx) => fxhd = Some(FaxHeader::parse(chunk.data)?),
        (b"YCHD", FormKind::Yuvn) => ychd = Some(YuvHeader::parse(chunk.data)?),
        (b"DGBL", FormKind::Deep) => dgbl = Some(DeepGlobal::parse(chunk.data)?),
        (b"DPEL", FormKind::Deep) => dpel = Some(DeepElements::parse(chunk.data)?),
        (b"DLOC", FormKind::Deep) => dloc = Some(DeepLocation::parse(chunk.data)?),
        (b"DCHG", FormKind::Deep) => dchg = Some(DeepChange::parse(chunk.data)?),
        (b"TVDC", FormKind::Deep) => tvdc = Some(TvdcTable::parse(chunk.data)?),

        (b"CRNG", _) => push_color_range(&mut vault, chunk.data)?,
        (b"ANNO", _) => vault.push_annotation(chunk.data),
        (b"TEXT", _) => vault.push_text(chunk.data),
        (b"EXIF" | b"IPTC" | b"XMP0" | b"ICCP" | b"ICCN" | b"GEOT" | b"GEOF" | b"GPHD" | b"FLOG" | b"AUTH", _) => {
          vault.push_other(chunk.tag, chunk.data);
        }

        (b"BODY", FormKind::Ilbm | FormKind::Pbm | FormKind::Rgbn | FormKind::Rgb8) => {
          data_chunk = Some(chunk.data);
          break 'chunks;
        }
        (b"ABIT", FormKind::Acbm) => {
          data_chunk = Some(chunk.data);
          break 'chunks;
        }
        (b"DBOD", FormKind::Deep) => {
          data_chunk = Some(chunk.data);
          break 'chunks;
        }
        (b"PAGE", FormKind::Faxx) => {
          data_chunk = Some(chunk.data);
          break 'chunks;
        }
        (b"DATY", FormKind::Yuvn) => daty = Some(chunk.data),
        (b"DATU", FormKind::Yuvn) => datu = Some(chunk.data),
        (b"DATV", FormKind::Yuvn) => datv = Some(chunk.data),
        (b"DATA", FormKind::Yuvn) => data_alpha = Some(chunk.data),

        _ => {}
      }
    }

    let metadata = if vault.is_empty() { None } else { Some(vault) };

    let (header, data_chunk, datu, datv, data_alpha, deep) = match form_kind {
      FormKind::Ilbm | FormKind::Pbm | FormKind::Acbm | FormKind::Rgbn | FormKind::Rgb8 => {
        let header = bmhd.ok_or(IffError::MissingRequiredProperty(RequiredProperty::Bmhd))?;
        let data = data_chunk.ok_or(IffError::StopChunkNotFound)?;
        (PrimaryHeader::Bitmap(header), data, None, None, None, None)
      }
      FormKind::Faxx => {
        let header = fxhd.ok_or(IffError::MissingRequiredProperty(RequiredProperty::Fxhd))?;
        let data = data_chunk.ok_or(IffError::StopChunkNotFound)?;
        (PrimaryHeader::Fax(header), data, None, None, None, None)
      }
      FormKind::Yuvn => {
        let header = ychd.ok_or(IffError::MissingRequiredProperty(RequiredProperty::Ychd))?;
        let data = daty.ok_or(IffError::StopChunkNotFound)?;
        (PrimaryHeader::Yuv(header), data, datu, datv, data_alpha, None)
      }
      FormKind::Deep => {
        let global = dgbl.ok_or(IffError::MissingRequiredProperty(RequiredProperty::Dgbl))?;
        let elements = dpel.ok_or(IffError::MissingRequiredProperty(RequiredProperty::Dpel))?;
        let data = data_chunk.ok_or(IffError::StopChunkNotFound)?;
        let records = DeepRecords { global, elements, location: dloc, change: dchg, tvdc };
        (PrimaryHeader::Bitmap(placeholder_bitmap_header(global)), data, None, None, None, Some(records))
      }
    };

    Ok(ImageHandle::new(form.form_type, form_kind, header, viewport, palette, deep, metadata, data_chunk, datu, datv, data_alpha))
  }
}

/// DEEP carries its own `DGBL` header rather than a `BMHD`; this synthesizes
/// a `PrimaryHeader::Bitmap` shell purely so `ImageHandle::header()` always
/// returns *something* uniform for plane-count-style queries elsewhere. The
/// dispatcher never reads it for DEEP — it reads `deep.as_ref()` instead.
fn placeholder_bitmap_header(global: DeepGlobal) -> BitmapHeader {
  use crate::headers::{BitmapCompression, Masking};
  BitmapHeader {
    width: global.display_width,
    height: global.display_height,
    x_origin: 0,
    y_origin: 0,
    n_planes: 0,
    masking: Masking::None,
    compression: BitmapCompression::None,
    transparent_color: 0,
    x_aspect: global.x_aspect,
    y_aspect: global.y_aspect,
    page_width: global.display_width as i16,
    page_height: global.display_height as i16,
  }
}

fn push_color_range(vault: &mut MetadataVault, data: &[u8]) -> Result<(), IffError> {
  if data.len() < 6 {
    return Err(IffError::TruncatedChunkPayload);
  }
  let mut r = BeReader::new(data);
  let rate = r.get_u16()?;
  let flags = r.get_u16()?;
  let low = r.get_u8()?;
  let high = r.get_u8()?;
  vault.push_color_range(ColorRange { rate, flags, low, high });
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec::Vec;

  fn minimal_ilbm() -> Vec<u8> {
    let mut bmhd = Vec::new();
    bmhd.extend_from_slice(&2u16.to_be_bytes()); // width
    bmhd.extend_from_slice(&2u16.to_be_bytes()); // height
    bmhd.extend_from_slice(&0i16.to_be_bytes()); // x origin
    bmhd.extend_from_slice(&0i16.to_be_bytes()); // y origin
    bmhd.push(1); // n_planes
    bmhd.push(0); // masking
    bmhd.push(0); // compression
    bmhd.push(0); // pad
    bmhd.extend_from_slice(&0u16.to_be_bytes()); // transparent color
    bmhd.push(1); // x aspect
    bmhd.push(1); // y aspect
    bmhd.extend_from_slice(&2i16.to_be_bytes()); // page width
    bmhd.extend_from_slice(&2i16.to_be_bytes()); // page height

    let body = [0xFFu8, 0x00];

    let mut out = Vec::new();
    out.extend_from_slice(b"FORM");
    let mut inner = Vec::new();
    inner.extend_from_slice(b"ILBM");
    inner.extend_from_slice(b"BMHD");
    inner.extend_from_slice(&(bmhd.len() as u32).to_be_bytes());
    inner.extend_from_slice(&bmhd);
    inner.extend_from_slice(b"BODY");
    inner.extend_from_slice(&(body.len() as u32).to_be_bytes());
    inner.extend_from_slice(&body);
    out.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    out.extend_from_slice(&inner);
    out
  }

  #[test]
  fn parses_minimal_ilbm_and_decodes() {
    let bytes = minimal_ilbm();
    let mut handle = ImageHandle::parse(&bytes).unwrap();
    assert_eq!(handle.form_kind(), FormKind::Ilbm);
    assert!(!handle.is_decoded());
    handle.decode().unwrap();
    assert!(handle.is_decoded());
    let raster = handle.raster().unwrap();
    assert_eq!(raster.pixels.len(), 2 * 2 * 3);
  }

  #[test]
  fn missing_bmhd_is_missing_required_property() {
    let mut out = Vec::new();
    out.extend_from_slice(b"FORM");
    let mut inner = Vec::new();
    inner.extend_from_slice(b"ILBM");
    inner.extend_from_slice(b"BODY");
    inner.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    out.extend_from_slice(&inner);
    assert!(matches!(
      ImageHandle::parse(&out),
      Err(IffError::MissingRequiredProperty(RequiredProperty::Bmhd))
    ));
  }

  #[test]
  fn unknown_form_type_is_unsupported() {
    let mut out = Vec::new();
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&4u32.to_be_bytes());
    out.extend_from_slice(b"WOOT");
    assert!(matches!(ImageHandle::parse(&out), Err(IffError::UnknownFormType)));
  }
}
