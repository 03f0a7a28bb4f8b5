//! Descriptor construction module
//!
//! Builds the color grid of an image: blocks are averaged luma/chroma values,
//! columns stack `grid_divisions` blocks over the full image height, and a
//! descriptor tiles columns across the full image width.

mod block;
mod column;
mod descriptor;
mod codec;
pub mod types;


pub use block::extract_block;
pub use column::build_column;
pub use descriptor::{DescriptorBuilder, build_descriptor, column_layout, MAX_SOURCE_LEN, MIN_IMAGE_WIDTH};
pub use codec::{BinaryDescriptorWriter, DescriptorWriter, read_descriptor, DESCRIPTOR_MAGIC, DESCRIPTOR_VERSION};
pub use types::{Block, Column, ImageDescriptor};
