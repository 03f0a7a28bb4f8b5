use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::decode::types::SampleBuffer;

/// Resizes `image` to `target_height` rows, keeping its native width.
pub(crate) fn resample_to_height(image: RgbImage, target_height: usize) -> Result<SampleBuffer> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || target_height == 0 {
        return Err(SignatureError::InvalidDimensions(width as usize, height as usize));
    }

    let target = u32::try_from(target_height)
        .map_err(|_| SignatureError::InvalidDimensions(width as usize, target_height))?;

    let resized = if height == target {
        image
    } else {
        debug!("Resampling {}x{} -> {}x{}", width, height, width, target);
        imageops::resize(&image, width, target, FilterType::Triangle)
    };

    SampleBuffer::from_raw(width as usize, target_height, resized.into_raw())
        .ok_or(SignatureError::InvalidDimensions(width as usize, target_height))
}
