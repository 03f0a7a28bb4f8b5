use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use crate::image_pipeline::color::MatchConfig;
use crate::image_pipeline::common::error::{Result, SignatureError};
use crate::image_pipeline::conversions::SignaturePipeline;
use crate::image_pipeline::decode::{SampleBuffer, SampleDecoder};
use crate::image_pipeline::signature::{DescriptorWriter, ImageDescriptor, read_descriptor, BinaryDescriptorWriter};

struct MockDecoder {
    should_fail: bool,
    width: usize,
    color: [u8; 3],
}

impl MockDecoder {
    fn solid(width: usize) -> Self {
        Self { should_fail: false, width, color: [100, 150, 200] }
    }
}

impl SampleDecoder for MockDecoder {
    fn decode(&self, _data: &[u8], target_height: usize) -> Result<SampleBuffer> {
        if self.should_fail {
            return Err(SignatureError::DecodeError("Mock decode error".to_string()));
        }
        Ok(SampleBuffer::filled(self.width, target_height, self.color))
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<String>>>,
}

impl DescriptorWriter for MockWriter {
    fn write_descriptor(&self, descriptor: &ImageDescriptor, _output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(SignatureError::EncodeError("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push(descriptor.source().to_string());
        Ok(())
    }
}

fn mock_writer() -> (MockWriter, Arc<Mutex<Vec<String>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    (MockWriter { should_fail: false, written: written.clone() }, written)
}

#[test]
fn test_successful_signature() {
    let (writer, written) = mock_writer();
    let pipeline = SignaturePipeline::with_custom(MockDecoder::solid(256), writer, MatchConfig::default()).unwrap();

    let descriptor = pipeline.signature(b"fake jpeg data", "mem://one").unwrap();
    assert_eq!(descriptor.source(), "mem://one");
    assert_eq!(descriptor.column_count(), 16);

    pipeline.write(&descriptor, &mut Cursor::new(Vec::new())).unwrap();
    assert_eq!(*written.lock().unwrap(), vec!["mem://one".to_string()]);
}

#[test]
fn test_decoder_failure() {
    let (writer, _) = mock_writer();
    let decoder = MockDecoder { should_fail: true, width: 256, color: [0; 3] };
    let pipeline = SignaturePipeline::with_custom(decoder, writer, MatchConfig::default()).unwrap();

    let result = pipeline.signature(b"fake jpeg data", "broken");
    assert!(matches!(result, Err(SignatureError::DecodeError(_))));
}

#[test]
fn test_writer_failure() {
    let writer = MockWriter { should_fail: true, written: Arc::new(Mutex::new(Vec::new())) };
    let pipeline = SignaturePipeline::with_custom(MockDecoder::solid(256), writer, MatchConfig::default()).unwrap();

    let descriptor = pipeline.signature(b"data", "x").unwrap();
    let result = pipeline.write(&descriptor, &mut Cursor::new(Vec::new()));
    assert!(matches!(result, Err(SignatureError::EncodeError(_))));
}

#[test]
fn test_narrow_image_is_rejected() {
    let (writer, _) = mock_writer();
    let pipeline = SignaturePipeline::with_custom(MockDecoder::solid(64), writer, MatchConfig::default()).unwrap();

    let result = pipeline.signature(b"data", "thumb.jpg");
    assert!(matches!(result, Err(SignatureError::NoDescriptor(ref s, 64)) if s == "thumb.jpg"));
}

#[test]
fn test_decoder_receives_configured_height() {
    let (writer, _) = mock_writer();
    let config = MatchConfig::builder().grid_divisions(32).image_height(512).build();
    let pipeline = SignaturePipeline::with_custom(MockDecoder::solid(200), writer, config).unwrap();

    let (descriptor, timings) = pipeline.signature_with_timings(b"data", "tall").unwrap();
    assert_eq!(descriptor.blocks_per_column(), 32);
    assert_eq!(descriptor.width(), 200);
    assert!(timings.get_step("decode").is_some());
    assert!(timings.get_step("build_descriptor").is_some());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let output = dir.path().join("input.dsig");
    std::fs::write(&input, b"anything, the mock ignores it").unwrap();

    let pipeline = SignaturePipeline::with_custom(
        MockDecoder::solid(300),
        BinaryDescriptorWriter,
        MatchConfig::builder().threads(2).build(),
    )
    .unwrap();

    let descriptor = pipeline.signature_file_to(&input, &output).unwrap();
    let stored = read_descriptor(&mut std::fs::File::open(&output).unwrap()).unwrap();

    assert_eq!(stored, descriptor);
    assert_eq!(stored.source(), input.display().to_string());
}

#[test]
fn test_file_to_file_timings_cover_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let output = dir.path().join("input.dsig");
    std::fs::write(&input, b"data").unwrap();

    let pipeline =
        SignaturePipeline::with_custom(MockDecoder::solid(256), BinaryDescriptorWriter, MatchConfig::default())
            .unwrap();

    let (descriptor, timings) = pipeline.signature_file_to_with_timings(&input, &output).unwrap();
    let names: Vec<&str> = timings.steps().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["decode", "build_descriptor", "write_descriptor"]);
    assert_eq!(timings.summary().len(), 4);
    assert_eq!(descriptor.column_count(), 16);
    assert!(output.exists());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, _) = mock_writer();
    let pipeline = SignaturePipeline::with_custom(MockDecoder::solid(256), writer, MatchConfig::default()).unwrap();

    let result = pipeline.signature_file(dir.path().join("nope.jpg"));
    assert!(matches!(result, Err(SignatureError::InputReadError(_))));
}

#[test]
fn test_batch_keeps_input_order_and_skips_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..6 {
        let path = dir.path().join(format!("{}.jpg", i));
        if i != 3 {
            std::fs::write(&path, b"data").unwrap();
        }
        paths.push(path);
    }

    let (writer, _) = mock_writer();
    let pipeline = SignaturePipeline::with_custom(
        MockDecoder::solid(256),
        writer,
        MatchConfig::builder().threads(3).build(),
    )
    .unwrap();

    let entries = pipeline.signature_batch(&paths);
    assert_eq!(entries.len(), 6);
    for (entry, path) in entries.iter().zip(&paths) {
        assert_eq!(&entry.path, path);
    }
    assert!(matches!(entries[3].result, Err(SignatureError::InputReadError(_))));
    assert_eq!(entries.iter().filter(|e| e.result.is_ok()).count(), 5);
    assert_eq!(
        entries[0].result.as_ref().unwrap().source(),
        paths[0].display().to_string()
    );
}
