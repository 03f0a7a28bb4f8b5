//! Color signature extraction for duplicate image detection.
//!
//! Decoded images are reduced to a grid of averaged luma/chroma blocks, an
//! [`ImageDescriptor`](image_pipeline::ImageDescriptor), that can later be
//! compared across a collection.

pub mod image_pipeline;
pub mod logger;
