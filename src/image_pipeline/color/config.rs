//! Matching configuration
//!
//! [`MatchConfig`] is built once and shared read-only by every descriptor
//! build. Out-of-range tuning values are coerced rather than rejected:
//!
//! | parameter        | accepted        | otherwise |
//! |------------------|-----------------|-----------|
//! | `grid_divisions` | 8, 16, 32       | 16        |
//! | `image_height`   | 128, 256, 512   | 128       |
//! | `threads`        | >= 1            | 1         |

use tracing::debug;

use super::lookup::{ChannelWeights, ColorLookupTable};

pub const DEFAULT_GRID_DIVISIONS: usize = 16;
pub const DEFAULT_IMAGE_HEIGHT: usize = 128;
pub const DEFAULT_THREADS: usize = 1;

const VALID_GRID_DIVISIONS: [usize; 3] = [8, 16, 32];
const VALID_IMAGE_HEIGHTS: [usize; 3] = [128, 256, 512];

/// Weights of the three output channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformWeights {
    pub luma: ChannelWeights,
    pub cr: ChannelWeights,
    pub cb: ChannelWeights,
}

impl TransformWeights {
    /// Builds the weights from nine coefficients: luma, Cr and Cb, each as red/green/blue.
    pub fn from_coefficients(c: [f64; 9]) -> Self {
        Self {
            luma: ChannelWeights::new(c[0], c[1], c[2]),
            cr: ChannelWeights::new(c[3], c[4], c[5]),
            cb: ChannelWeights::new(c[6], c[7], c[8]),
        }
    }
}

impl Default for TransformWeights {
    fn default() -> Self {
        Self::from_coefficients([
            0.299, 0.587, 0.114,
            -0.147, -0.209, 0.436,
            0.615, -0.515, -0.1,
        ])
    }
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    luma: ColorLookupTable,
    cr: ColorLookupTable,
    cb: ColorLookupTable,
    grid_divisions: usize,
    image_height: usize,
    threads: usize,
}

impl MatchConfig {
    /// Builds the lookup tables and normalizes the tuning parameters. Never fails.
    pub fn new(weights: TransformWeights, grid_divisions: i64, image_height: i64, threads: i64) -> Self {
        let config = Self {
            luma: ColorLookupTable::new(weights.luma),
            cr: ColorLookupTable::new(weights.cr),
            cb: ColorLookupTable::new(weights.cb),
            grid_divisions: normalize_grid_divisions(grid_divisions),
            image_height: normalize_image_height(image_height),
            threads: normalize_threads(threads),
        };
        debug!(
            grid_divisions = config.grid_divisions,
            image_height = config.image_height,
            threads = config.threads,
            "Match config created"
        );
        config
    }

    pub fn builder() -> MatchConfigBuilder {
        MatchConfigBuilder::default()
    }

    pub fn luma_table(&self) -> &ColorLookupTable {
        &self.luma
    }

    pub fn cr_table(&self) -> &ColorLookupTable {
        &self.cr
    }

    pub fn cb_table(&self) -> &ColorLookupTable {
        &self.cb
    }

    pub fn grid_divisions(&self) -> usize {
        self.grid_divisions
    }

    pub fn image_height(&self) -> usize {
        self.image_height
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Height in pixels of one block. Always integral for the accepted parameter values.
    pub fn block_height(&self) -> usize {
        self.image_height / self.grid_divisions
    }

    /// Luma, Cr and Cb of a single pixel.
    #[inline]
    pub fn transform(&self, red: u8, green: u8, blue: u8) -> [f64; 3] {
        [
            self.luma.evaluate(red, green, blue),
            self.cr.evaluate(red, green, blue),
            self.cb.evaluate(red, green, blue),
        ]
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn normalize_grid_divisions(requested: i64) -> usize {
    match usize::try_from(requested) {
        Ok(value) if VALID_GRID_DIVISIONS.contains(&value) => value,
        _ => DEFAULT_GRID_DIVISIONS,
    }
}

fn normalize_image_height(requested: i64) -> usize {
    match usize::try_from(requested) {
        Ok(value) if VALID_IMAGE_HEIGHTS.contains(&value) => value,
        _ => DEFAULT_IMAGE_HEIGHT,
    }
}

fn normalize_threads(requested: i64) -> usize {
    usize::try_from(requested)
        .ok()
        .filter(|&threads| threads >= 1)
        .unwrap_or(DEFAULT_THREADS)
}

/// Builder for MatchConfig
#[derive(Default)]
pub struct MatchConfigBuilder {
    weights: Option<TransformWeights>,
    grid_divisions: Option<i64>,
    image_height: Option<i64>,
    threads: Option<i64>,
}

impl MatchConfigBuilder {
    pub fn weights(mut self, weights: TransformWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn coefficients(mut self, coefficients: [f64; 9]) -> Self {
        self.weights = Some(TransformWeights::from_coefficients(coefficients));
        self
    }

    pub fn grid_divisions(mut self, grid_divisions: i64) -> Self {
        self.grid_divisions = Some(grid_divisions);
        self
    }

    pub fn image_height(mut self, image_height: i64) -> Self {
        self.image_height = Some(image_height);
        self
    }

    pub fn threads(mut self, threads: i64) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn build(self) -> MatchConfig {
        MatchConfig::new(
            self.weights.unwrap_or_default(),
            self.grid_divisions.unwrap_or(DEFAULT_GRID_DIVISIONS as i64),
            self.image_height.unwrap_or(DEFAULT_IMAGE_HEIGHT as i64),
            self.threads.unwrap_or(DEFAULT_THREADS as i64),
        )
    }
}
