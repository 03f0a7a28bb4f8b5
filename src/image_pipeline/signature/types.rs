//! Descriptor data types

/// Mean luma and chroma of one rectangular pixel region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Block {
    pub luma: f64,
    pub cr: f64,
    pub cb: f64,
}

impl Block {
    pub fn new(luma: f64, cr: f64, cb: f64) -> Self {
        Self { luma, cr, cb }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.luma, self.cr, self.cb]
    }
}

impl From<[f64; 3]> for Block {
    fn from([luma, cr, cb]: [f64; 3]) -> Self {
        Self { luma, cr, cb }
    }
}

/// A vertical strip of the image, blocks ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    width: usize,
    blocks: Vec<Block>,
}

impl Column {
    pub fn new(width: usize, blocks: Vec<Block>) -> Self {
        Self { width, blocks }
    }

    /// Width of the strip in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Color signature of one source image. Columns are ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    source: String,
    columns: Vec<Column>,
}

impl ImageDescriptor {
    pub fn new(source: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            source: source.into(),
            columns,
        }
    }

    /// File path or logical key the descriptor was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sum of the column widths, equal to the width of the sampled image.
    pub fn width(&self) -> usize {
        self.columns.iter().map(Column::width).sum()
    }

    pub fn blocks_per_column(&self) -> usize {
        self.columns.first().map_or(0, Column::block_count)
    }

    /// Every block, column by column.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.columns.iter().flat_map(|column| column.blocks.iter())
    }
}
