//! JPEG decoder backed by the `image` crate's JPEG codec.

use std::io::Cursor;

use image::DynamicImage;
use image::codecs::jpeg::JpegDecoder as JpegCodec;
use tracing::debug;

use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::decode::decoder::SampleDecoder;
use crate::image_pipeline::decode::resample::resample_to_height;
use crate::image_pipeline::decode::types::SampleBuffer;

const SOS: [u8; 2] = [0xFF, 0xDA];
const EOI: [u8; 2] = [0xFF, 0xD9];

pub struct JpegDecoder;

/// True when an end-of-image marker follows the start of the last scan.
///
/// Entropy-coded data byte-stuffs every `0xFF`, so neither marker can occur
/// inside a scan. Markers in an embedded thumbnail precede the frame's own scans.
fn scan_is_complete(data: &[u8]) -> bool {
    match data.windows(2).rposition(|pair| pair == SOS) {
        Some(last_scan) => data[last_scan..].windows(2).any(|pair| pair == EOI),
        None => false,
    }
}

impl SampleDecoder for JpegDecoder {
    /// Decodes a baseline or progressive JPEG and converts it to RGB8.
    ///
    /// A stream whose header cannot be parsed fails with
    /// [`SignatureError::HeaderError`]; a failure while reading scan data fails
    /// with [`SignatureError::DecodeError`]. So does a stream that ends before
    /// its last scan is closed, since the codec would grey-fill the missing rows.
    fn decode(&self, data: &[u8], target_height: usize) -> Result<SampleBuffer> {
        debug!("Decoding JPEG image, {} bytes", data.len());

        let codec = JpegCodec::new(Cursor::new(data))
            .map_err(|e| SignatureError::HeaderError(e.to_string()))?;

        if !scan_is_complete(data) {
            return Err(SignatureError::DecodeError(
                "JPEG stream ends inside its scan data".to_string(),
            ));
        }

        let image = DynamicImage::from_decoder(codec)
            .map_err(|e| SignatureError::DecodeError(e.to_string()))?;

        debug!("Decoded JPEG: {}x{}", image.width(), image.height());

        resample_to_height(image.to_rgb8(), target_height)
    }
}
