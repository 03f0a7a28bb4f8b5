//! Color transform module
//!
//! Lookup tables for the linear RGB → luma/chroma transform and the shared,
//! normalized matching configuration that owns them.

mod lookup;
mod config;

pub use lookup::{ChannelWeights, ColorLookupTable};
pub use config::{MatchConfig, MatchConfigBuilder, TransformWeights};
