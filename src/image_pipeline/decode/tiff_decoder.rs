//! TIFF decoder using the tiff library.

use std::io::Cursor;

use image::RgbImage;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::decode::decoder::SampleDecoder;
use crate::image_pipeline::decode::resample::resample_to_height;
use crate::image_pipeline::decode::types::SampleBuffer;

/// Reads the first image of a TIFF file.
///
/// Supports 8 and 16 bit gray, gray+alpha, RGB and RGBA layouts. Alpha is
/// dropped and 16 bit samples keep their high byte.
pub struct TiffDecoder;

impl SampleDecoder for TiffDecoder {
    fn decode(&self, data: &[u8], target_height: usize) -> Result<SampleBuffer> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| SignatureError::HeaderError(e.to_string()))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| SignatureError::HeaderError(e.to_string()))?;
        let color_type = decoder
            .colortype()
            .map_err(|e| SignatureError::HeaderError(e.to_string()))?;

        debug!("TIFF header: {}x{} {:?}", width, height, color_type);

        let channels = match color_type {
            ColorType::Gray(8 | 16) => 1,
            ColorType::GrayA(8 | 16) => 2,
            ColorType::RGB(8 | 16) => 3,
            ColorType::RGBA(8 | 16) => 4,
            other => return Err(SignatureError::UnsupportedFormat(format!("TIFF {:?}", other))),
        };

        let samples: Vec<u8> = match decoder
            .read_image()
            .map_err(|e| SignatureError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(values) => values,
            DecodingResult::U16(values) => values.iter().map(|&v| (v >> 8) as u8).collect(),
            _ => return Err(SignatureError::UnsupportedFormat(format!("TIFF {:?}", color_type))),
        };

        let pixel_count = width as usize * height as usize;
        if samples.len() != pixel_count * channels {
            return Err(SignatureError::DecodeError(format!(
                "expected {} samples, got {}",
                pixel_count * channels,
                samples.len()
            )));
        }

        let rgb = expand_to_rgb(&samples, channels);
        let image = RgbImage::from_raw(width, height, rgb)
            .ok_or(SignatureError::InvalidDimensions(width as usize, height as usize))?;

        resample_to_height(image, target_height)
    }
}

fn expand_to_rgb(samples: &[u8], channels: usize) -> Vec<u8> {
    match channels {
        3 => samples.to_vec(),
        4 => samples.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect(),
        // gray and gray+alpha
        _ => samples.chunks_exact(channels).flat_map(|px| [px[0]; 3]).collect(),
    }
}
