//! Pipeline conversions module
//!
//! This module contains orchestration logic turning image files into descriptors.

mod image_to_signature;

#[cfg(test)]
mod tests;

pub use image_to_signature::{BatchEntry, SignaturePipeline};
