use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::decoder::SampleDecoder;
use crate::image_pipeline::decode::jpeg_decoder::JpegDecoder;
use crate::image_pipeline::decode::raw_decoder::RawDecoder;
use crate::image_pipeline::decode::tiff_decoder::TiffDecoder;
use crate::image_pipeline::decode::types::SampleBuffer;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const TIFF_MAGIC_LE: [u8; 4] = *b"II*\0";
const TIFF_MAGIC_BE: [u8; 4] = *b"MM\0*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Jpeg,
    Tiff,
    Other,
}

fn sniff(data: &[u8]) -> Container {
    if data.starts_with(&JPEG_MAGIC) {
        Container::Jpeg
    } else if data.starts_with(&TIFF_MAGIC_LE) || data.starts_with(&TIFF_MAGIC_BE) {
        Container::Tiff
    } else {
        Container::Other
    }
}

/// Chooses a decoder from the leading magic bytes.
///
/// Most camera RAW formats are TIFF containers, so TIFF files go to
/// [`RawDecoder`] first and fall back to [`TiffDecoder`] when rawloader does
/// not recognize the camera.
pub struct AutoDecoder;

impl SampleDecoder for AutoDecoder {
    fn decode(&self, data: &[u8], target_height: usize) -> Result<SampleBuffer> {
        match sniff(data) {
            Container::Jpeg => JpegDecoder.decode(data, target_height),
            Container::Tiff => RawDecoder.decode(data, target_height).or_else(|e| {
                debug!("Not a camera RAW ({}), decoding as plain TIFF", e);
                TiffDecoder.decode(data, target_height)
            }),
            Container::Other => RawDecoder.decode(data, target_height),
        }
    }
}
