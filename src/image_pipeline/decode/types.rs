//! Decoded sample types

/// Row-major interleaved RGB8 samples `[R, G, B, R, G, B, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl SampleBuffer {
    /// Wraps `data`, returning `None` unless it holds exactly `width * height` RGB triples.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(3)?;
        if data.len() != expected {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// A buffer where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let data = rgb.repeat(width * height);
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples `[x, x + len)` of row `y`, or `None` if the span leaves the buffer.
    pub fn row_span(&self, y: usize, x: usize, len: usize) -> Option<&[u8]> {
        if y >= self.height || x.checked_add(len)? > self.width {
            return None;
        }
        let start = (y * self.width + x) * 3;
        self.data.get(start..start + len * 3)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        let span = self.row_span(y, x, 1)?;
        Some([span[0], span[1], span[2]])
    }
}
