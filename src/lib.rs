#![cfg_attr(not(feature = "trace"), no_std)]
#![forbid(unsafe_code)]
//! Decodes legacy IFF bitmap images — ILBM (including HAM and EHB), PBM,
//! ACBM, RGBN, RGB8, DEEP, FAXX (including the MH and MR fax codecs), and
//! YUVN — into a canonical raster plus the parameters a PNG encoder would
//! need to re-serialize it.
//!
//! This crate parses and decodes; it does not write IFF, encode PNG, reduce
//! colour depth, or render anything to a screen. See [`image::ImageHandle`]
//! for the entry point.

#[cfg(any(feature = "alloc", test))]
extern crate alloc;
#[cfg(feature = "trace")]
extern crate std;

/// Emits a one-line trace message, gated behind the `trace` feature.
///
/// Identical in shape to `imagine`'s own `trace!`: a no-op unless `trace` is
/// enabled, in which case it prints the call site and message to stdout.
#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

mod reader;
mod chunk;
mod byterun1;
mod planes;
mod bitstream;

pub mod error;
pub mod headers;
pub mod image;

#[cfg(feature = "alloc")]
pub mod metadata;
#[cfg(feature = "alloc")]
pub(crate) mod dispatch;
#[cfg(feature = "alloc")]
pub(crate) mod analyser;
#[cfg(feature = "alloc")]
pub mod png_config;
#[cfg(feature = "alloc")]
pub(crate) mod parse;
#[cfg(feature = "alloc")]
pub(crate) mod formats;

pub use error::{ErrorCode, IffError, IffResult, RequiredProperty};
pub use image::FormKind;
#[cfg(feature = "alloc")]
pub use image::{DecodedRaster, ImageHandle};
#[cfg(feature = "alloc")]
pub use png_config::PngConfig;
