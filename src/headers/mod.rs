//! Typed interpreters for IFF's fixed-layout, big-endian header chunks.

mod bmhd;
mod camg;
mod cmap;
mod deep;
mod fxhd;
mod ychd;

pub use bmhd::{BitmapCompression, BitmapHeader, Masking};
pub use camg::{ViewportMode, VM_EXTRA_HALFBRITE, VM_HAM, VM_HIRES, VM_LACE};
pub use deep::{DeepChange, DeepCompression, DeepElement, DeepGlobal, DeepLocation};
pub use fxhd::{FaxCompression, FaxHeader};
pub use ychd::{TvNorm, YuvHeader, YuvSubsampling};

#[cfg(feature = "alloc")]
pub use cmap::Palette;
#[cfg(feature = "alloc")]
pub use deep::{DeepElements, TvdcTable};
