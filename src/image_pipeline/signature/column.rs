use crate::image_pipeline::color::MatchConfig;
use crate::image_pipeline::decode::SampleBuffer;
use crate::image_pipeline::signature::block::extract_block;
use crate::image_pipeline::signature::types::Column;

/// Builds the column starting at `x`: `grid_divisions` blocks of `column_width`
/// pixels, one per block-height step from the top.
///
/// Returns `None` if `x` is outside the image, the width is zero or wider than
/// the image, or any block cannot be extracted.
pub fn build_column(
    samples: &SampleBuffer,
    x: usize,
    column_width: usize,
    config: &MatchConfig,
) -> Option<Column> {
    let image_width = samples.width();
    if x >= image_width || column_width == 0 || column_width > image_width {
        return None;
    }

    let step = config.block_height();
    let blocks = (0..config.grid_divisions())
        .map(|i| extract_block(samples, x, i * step, column_width, step, config))
        .collect::<Option<Vec<_>>>()?;

    Some(Column::new(column_width, blocks))
}
