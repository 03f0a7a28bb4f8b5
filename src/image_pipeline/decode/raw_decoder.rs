//! Camera RAW decoder using the rawloader library.
//!
//! Any format rawloader understands (ARW, CR2, NEF, DNG, RAF, ...) is decoded
//! to sensor values. Single channel Bayer data is demosaiced with the `bayer`
//! crate; three channel linear data is used directly. Sensor values are then
//! normalized with the black/white levels and white balance coefficients,
//! gamma encoded and reduced to 8 bits before resampling.

use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use image::RgbImage;
use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::decode::decoder::SampleDecoder;
use crate::image_pipeline::decode::resample::resample_to_height;
use crate::image_pipeline::decode::types::SampleBuffer;

const DISPLAY_GAMMA: f32 = 2.2;

pub struct RawDecoder;

/// Black and white levels plus per-channel white balance multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Levels {
    black: f32,
    white: f32,
    wb: [f32; 3],
}

impl Levels {
    fn from_metadata(black: u16, white: u16, wb_coeffs: [f32; 4]) -> Self {
        let black = black as f32;
        let white = if white == 0 { u16::MAX as f32 } else { white as f32 };

        // rawloader reports missing white balance as NaN
        let green = wb_coeffs[1];
        let wb = if green.is_finite() && green > 0.0 && wb_coeffs[0].is_finite() && wb_coeffs[2].is_finite() {
            [wb_coeffs[0] / green, 1.0, wb_coeffs[2] / green]
        } else {
            [1.0; 3]
        };

        Self { black, white, wb }
    }

    fn to_display(&self, value: u16, channel: usize) -> u8 {
        let range = (self.white - self.black).max(1.0);
        let linear = ((value as f32 - self.black).max(0.0) / range * self.wb[channel]).clamp(0.0, 1.0);
        (linear.powf(1.0 / DISPLAY_GAMMA) * 255.0).round() as u8
    }
}

impl SampleDecoder for RawDecoder {
    fn decode(&self, data: &[u8], target_height: usize) -> Result<SampleBuffer> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| SignatureError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        if width == 0 || height == 0 {
            return Err(SignatureError::InvalidDimensions(width, height));
        }

        debug!(
            "Decoded RAW: {}x{} cpp={} cfa={} ({} {})",
            width, height, decoded.cpp, decoded.cfa.name, decoded.make, decoded.model
        );

        // Float data is normalized to 0.0-1.0, so it gets the full u16 range as levels
        let (sensor, levels): (Vec<u16>, Levels) = match decoded.data {
            RawloaderImageData::Integer(values) => (
                values,
                Levels::from_metadata(decoded.blacklevels[0], decoded.whitelevels[0], decoded.wb_coeffs),
            ),
            RawloaderImageData::Float(values) => (
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect(),
                Levels::from_metadata(0, u16::MAX, decoded.wb_coeffs),
            ),
        };

        let rgb16 = match decoded.cpp {
            1 => demosaic(&sensor, width, height, &decoded.cfa.name)?,
            3 => sensor,
            cpp => {
                return Err(SignatureError::UnsupportedFormat(format!(
                    "RAW with {} components per pixel",
                    cpp
                )));
            }
        };

        if rgb16.len() != width * height * 3 {
            return Err(SignatureError::DecodeError(format!(
                "expected {} RGB samples, got {}",
                width * height * 3,
                rgb16.len()
            )));
        }

        let rgb8: Vec<u8> = rgb16
            .chunks_exact(3)
            .flat_map(|px| {
                [
                    levels.to_display(px[0], 0),
                    levels.to_display(px[1], 1),
                    levels.to_display(px[2], 2),
                ]
            })
            .collect();

        let image = RgbImage::from_raw(width as u32, height as u32, rgb8)
            .ok_or(SignatureError::InvalidDimensions(width, height))?;

        resample_to_height(image, target_height)
    }
}

fn bayer_pattern(name: &str) -> Result<CFA> {
    match name {
        "RGGB" => Ok(CFA::RGGB),
        "BGGR" => Ok(CFA::BGGR),
        "GRBG" => Ok(CFA::GRBG),
        "GBRG" => Ok(CFA::GBRG),
        other => Err(SignatureError::UnsupportedFormat(format!("CFA pattern {}", other))),
    }
}

/// Linear demosaic of 16 bit Bayer data into interleaved RGB.
fn demosaic(sensor: &[u16], width: usize, height: usize, cfa_name: &str) -> Result<Vec<u16>> {
    let cfa = bayer_pattern(cfa_name)?;

    let bayer_bytes: Vec<u8> = sensor.iter().flat_map(|&v| v.to_le_bytes()).collect();
    let mut output_buf = vec![0u8; width * height * 3 * 2];

    debug!("Running demosaic with CFA={}, algo=Linear", cfa_name);

    {
        let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut Cursor::new(&bayer_bytes[..]),
            BayerDepth::Depth16LE,
            cfa,
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| SignatureError::DecodeError(format!("Demosaic failed: {:?}", e)))?;
    }

    // the raster stores u16 samples in native byte order
    Ok(output_buf
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect())
}
