use crate::image_pipeline::color::MatchConfig;
use crate::image_pipeline::decode::SampleBuffer;
use crate::image_pipeline::signature::types::Block;

/// Mean transformed color of the `width` x `height` region whose top-left corner is `(x, y)`.
///
/// `y` must be a multiple of the configured block height and no greater than
/// the configured image height, and the region must be non-empty and lie
/// inside `samples`. Otherwise no block is produced.
pub fn extract_block(
    samples: &SampleBuffer,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    config: &MatchConfig,
) -> Option<Block> {
    let step = config.block_height();
    if y % step != 0 || y > config.image_height() || width == 0 || height == 0 {
        return None;
    }

    let mut sum = [0.0f64; 3];
    for row in y..y.checked_add(height)? {
        let span = samples.row_span(row, x, width)?;
        for px in span.chunks_exact(3) {
            let [luma, cr, cb] = config.transform(px[0], px[1], px[2]);
            sum[0] += luma;
            sum[1] += cr;
            sum[2] += cb;
        }
    }

    let count = (width * height) as f64;
    Some(Block::new(sum[0] / count, sum[1] / count, sum[2] / count))
}
