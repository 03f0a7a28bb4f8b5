//! Image signature pipeline module
//!
//! This module provides a structured approach to color signature extraction,
//! with separate modules for decoding, the color transform, descriptor
//! construction and the file-level orchestration.

pub mod color;
pub mod common;
pub mod conversions;
pub mod decode;
pub mod signature;

pub use common::{
    SignatureError,
    Result,
    PipelineTimings,
    StepTiming,
    Timer,
};

pub use color::{
    ChannelWeights,
    ColorLookupTable,
    MatchConfig,
    MatchConfigBuilder,
    TransformWeights,
};

pub use decode::{
    AutoDecoder,
    JpegDecoder,
    RawDecoder,
    SampleBuffer,
    SampleDecoder,
    TiffDecoder,
};

pub use signature::{
    Block,
    Column,
    DescriptorBuilder,
    DescriptorWriter,
    BinaryDescriptorWriter,
    ImageDescriptor,
    build_column,
    build_descriptor,
    column_layout,
    extract_block,
    read_descriptor,
    MAX_SOURCE_LEN,
    MIN_IMAGE_WIDTH,
};

pub use conversions::{
    BatchEntry,
    SignaturePipeline,
};
