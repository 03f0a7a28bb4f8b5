use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, instrument};

use crate::image_pipeline::color::MatchConfig;
use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::decode::SampleBuffer;
use crate::image_pipeline::signature::column::build_column;
use crate::image_pipeline::signature::types::{Column, ImageDescriptor};

/// Narrowest image a descriptor is built for.
pub const MIN_IMAGE_WIDTH: usize = 128;

/// Longest source identifier, in bytes, a descriptor carries.
pub const MAX_SOURCE_LEN: usize = 4096;

/// `(x, width)` of every column covering an image `image_width` pixels wide.
///
/// Columns are `image_width / grid_divisions` pixels wide; when that does not
/// divide the image evenly one narrower column covers the remainder.
pub fn column_layout(image_width: usize, grid_divisions: usize) -> Vec<(usize, usize)> {
    let nominal = match image_width.checked_div(grid_divisions) {
        Some(nominal) if nominal > 0 => nominal,
        _ => return Vec::new(),
    };

    (0..image_width.div_ceil(nominal))
        .map(|i| {
            let x = i * nominal;
            (x, nominal.min(image_width - x))
        })
        .collect()
}

/// Builds the descriptor of `samples`, running column construction on the current rayon pool.
///
/// Returns `None` when the source identifier is empty or longer than
/// [`MAX_SOURCE_LEN`] bytes, the image is narrower
/// than [`MIN_IMAGE_WIDTH`], the sample height differs from the configured
/// image height, or any column fails. A descriptor is never returned with
/// missing columns or blocks.
pub fn build_descriptor(source: &str, samples: &SampleBuffer, config: &MatchConfig) -> Option<ImageDescriptor> {
    let image_width = samples.width();
    if source.is_empty()
        || source.len() > MAX_SOURCE_LEN
        || image_width < MIN_IMAGE_WIDTH
        || samples.height() != config.image_height()
    {
        debug!(
            source,
            width = image_width,
            height = samples.height(),
            "Image does not meet descriptor preconditions"
        );
        return None;
    }

    let layout = column_layout(image_width, config.grid_divisions());

    // indexed collect keeps columns in horizontal order whatever order workers finish in
    let columns: Vec<Column> = layout
        .par_iter()
        .map(|&(x, width)| build_column(samples, x, width, config))
        .collect::<Option<Vec<_>>>()?;

    Some(ImageDescriptor::new(source, columns))
}

/// Builds descriptors on a worker pool sized by [`MatchConfig::threads`].
pub struct DescriptorBuilder {
    config: Arc<MatchConfig>,
    pool: ThreadPool,
}

impl DescriptorBuilder {
    pub fn new(config: Arc<MatchConfig>) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("signature-worker-{}", i))
            .build()
            .map_err(|e| SignatureError::WorkerPool(e.to_string()))?;

        debug!("Descriptor worker pool started with {} threads", config.threads());

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[instrument(skip(self, samples), fields(width = samples.width(), height = samples.height()))]
    pub fn build(&self, source: &str, samples: &SampleBuffer) -> Option<ImageDescriptor> {
        self.pool.install(|| build_descriptor(source, samples, &self.config))
    }

    /// Runs `op` inside the worker pool, so parallel iterators in it share the pool's threads.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
