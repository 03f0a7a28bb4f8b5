use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::types::SampleBuffer;

/// Decodes encoded image bytes into RGB samples `target_height` rows tall at the native width.
///
/// Decoders must fail instead of returning partially decoded samples.
pub trait SampleDecoder: Send + Sync {
    fn decode(&self, data: &[u8], target_height: usize) -> Result<SampleBuffer>;
}
