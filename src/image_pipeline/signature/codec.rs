//! Fixed-stride binary descriptor format.
//!
//! All integers and floats are little-endian:
//!
//! ```text
//! magic    b"DSIG"
//! version  u8
//! src_len  u32, followed by src_len bytes of UTF-8
//! columns  u32
//! blocks   u32 (per column)
//! columns x { width u32, blocks x { luma f64, cr f64, cb f64 } }
//! ```

use std::io::{ErrorKind, Read, Write};

use tracing::debug;

use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::signature::descriptor::MAX_SOURCE_LEN;
use crate::image_pipeline::signature::types::{Block, Column, ImageDescriptor};

pub const DESCRIPTOR_MAGIC: [u8; 4] = *b"DSIG";
pub const DESCRIPTOR_VERSION: u8 = 1;

pub trait DescriptorWriter: Send + Sync {
    fn write_descriptor(&self, descriptor: &ImageDescriptor, output: &mut dyn Write) -> Result<()>;
}

pub struct BinaryDescriptorWriter;

fn encode_u32(value: usize, what: &str) -> Result<[u8; 4]> {
    u32::try_from(value)
        .map(u32::to_le_bytes)
        .map_err(|_| SignatureError::EncodeError(format!("{} {} does not fit in u32", what, value)))
}

impl DescriptorWriter for BinaryDescriptorWriter {
    fn write_descriptor(&self, descriptor: &ImageDescriptor, output: &mut dyn Write) -> Result<()> {
        let source = descriptor.source().as_bytes();
        if source.len() > MAX_SOURCE_LEN {
            return Err(SignatureError::EncodeError(format!(
                "source identifier is {} bytes, limit is {}",
                source.len(),
                MAX_SOURCE_LEN
            )));
        }

        let blocks = descriptor.blocks_per_column();
        if descriptor.column_count() == 0 || blocks == 0 {
            return Err(SignatureError::EncodeError("descriptor has no blocks".to_string()));
        }
        if descriptor.columns().iter().any(|c| c.block_count() != blocks) {
            return Err(SignatureError::EncodeError(
                "columns have differing block counts".to_string(),
            ));
        }

        let stride = 4 + blocks * 3 * 8;
        let mut buffer = Vec::with_capacity(17 + source.len() + descriptor.column_count() * stride);
        buffer.extend_from_slice(&DESCRIPTOR_MAGIC);
        buffer.push(DESCRIPTOR_VERSION);
        buffer.extend_from_slice(&encode_u32(source.len(), "source length")?);
        buffer.extend_from_slice(source);
        buffer.extend_from_slice(&encode_u32(descriptor.column_count(), "column count")?);
        buffer.extend_from_slice(&encode_u32(blocks, "block count")?);

        for column in descriptor.columns() {
            buffer.extend_from_slice(&encode_u32(column.width(), "column width")?);
            for block in column.blocks() {
                for value in block.to_array() {
                    buffer.extend_from_slice(&value.to_le_bytes());
                }
            }
        }

        output.write_all(&buffer)?;

        debug!("Wrote descriptor for {}: {} bytes", descriptor.source(), buffer.len());
        Ok(())
    }
}

fn fill(input: &mut dyn Read, buf: &mut [u8]) -> Result<()> {
    input.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => SignatureError::MalformedDescriptor("truncated input".to_string()),
        _ => SignatureError::IoError(e),
    })
}

fn read_bytes<const N: usize>(input: &mut dyn Read) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    fill(input, &mut bytes)?;
    Ok(bytes)
}

fn read_u32(input: &mut dyn Read) -> Result<usize> {
    Ok(u32::from_le_bytes(read_bytes(input)?) as usize)
}

fn read_f64(input: &mut dyn Read) -> Result<f64> {
    Ok(f64::from_le_bytes(read_bytes(input)?))
}

/// Reads one descriptor written by [`BinaryDescriptorWriter`].
pub fn read_descriptor(input: &mut dyn Read) -> Result<ImageDescriptor> {
    if read_bytes::<4>(input)? != DESCRIPTOR_MAGIC {
        return Err(SignatureError::MalformedDescriptor("bad magic".to_string()));
    }

    let [version] = read_bytes::<1>(input)?;
    if version != DESCRIPTOR_VERSION {
        return Err(SignatureError::MalformedDescriptor(format!(
            "unsupported version {}",
            version
        )));
    }

    let source_len = read_u32(input)?;
    if source_len > MAX_SOURCE_LEN {
        return Err(SignatureError::MalformedDescriptor(format!(
            "source identifier length {} exceeds {}",
            source_len, MAX_SOURCE_LEN
        )));
    }
    let mut source = vec![0u8; source_len];
    fill(input, &mut source)?;
    let source = String::from_utf8(source)
        .map_err(|_| SignatureError::MalformedDescriptor("source identifier is not UTF-8".to_string()))?;

    let column_count = read_u32(input)?;
    let block_count = read_u32(input)?;
    if column_count == 0 || block_count == 0 {
        return Err(SignatureError::MalformedDescriptor(format!(
            "empty layout: {} columns x {} blocks",
            column_count, block_count
        )));
    }

    // counts are unverified until their data has been read
    let mut columns = Vec::with_capacity(column_count.min(1024));
    for _ in 0..column_count {
        let width = read_u32(input)?;
        let mut blocks = Vec::with_capacity(block_count.min(1024));
        for _ in 0..block_count {
            blocks.push(Block::new(read_f64(input)?, read_f64(input)?, read_f64(input)?));
        }
        columns.push(Column::new(width, blocks));
    }

    Ok(ImageDescriptor::new(source, columns))
}
