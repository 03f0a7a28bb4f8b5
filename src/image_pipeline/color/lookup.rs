//! Precomputed per-byte contributions of a linear color transform.

/// Red, green and blue weights of one output channel of the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelWeights {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Contribution {
    red: f64,
    green: f64,
    blue: f64,
}

/// 256-entry table holding `weight * v` for every byte value `v` and every input channel.
///
/// Evaluating one output channel for a pixel reduces to three lookups and two
/// additions, see [`ColorLookupTable::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLookupTable {
    weights: ChannelWeights,
    entries: Box<[Contribution; 256]>,
}

impl ColorLookupTable {
    pub fn new(weights: ChannelWeights) -> Self {
        let mut entries = Box::new([Contribution::default(); 256]);
        for (v, entry) in entries.iter_mut().enumerate() {
            let v = v as f64;
            *entry = Contribution {
                red: weights.red * v,
                green: weights.green * v,
                blue: weights.blue * v,
            };
        }
        Self { weights, entries }
    }

    pub fn weights(&self) -> ChannelWeights {
        self.weights
    }

    /// Contribution of a red sample `v`.
    #[inline]
    pub fn red(&self, v: u8) -> f64 {
        self.entries[v as usize].red
    }

    #[inline]
    pub fn green(&self, v: u8) -> f64 {
        self.entries[v as usize].green
    }

    #[inline]
    pub fn blue(&self, v: u8) -> f64 {
        self.entries[v as usize].blue
    }

    /// Transformed value of one pixel for this table's output channel.
    #[inline]
    pub fn evaluate(&self, red: u8, green: u8, blue: u8) -> f64 {
        self.entries[red as usize].red
            + self.entries[green as usize].green
            + self.entries[blue as usize].blue
    }
}
