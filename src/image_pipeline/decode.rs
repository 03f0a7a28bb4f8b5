//! Image decoding module
//!
//! Decoders turn encoded image bytes into RGB sample buffers resampled to the
//! configured height. JPEG is the primary input; TIFF and camera RAW files are
//! handled by their own decoders, and [`AutoDecoder`] picks one from the
//! file's magic bytes.

mod decoder;
mod resample;
mod jpeg_decoder;
mod tiff_decoder;
mod raw_decoder;
mod auto_decoder;
pub mod types;

pub use decoder::SampleDecoder;
pub use jpeg_decoder::JpegDecoder;
pub use tiff_decoder::TiffDecoder;
pub use raw_decoder::RawDecoder;
pub use auto_decoder::AutoDecoder;
pub use types::SampleBuffer;
