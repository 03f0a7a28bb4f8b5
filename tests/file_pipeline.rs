use std::io::Cursor;

use duplim_rs::image_pipeline::{
    AutoDecoder, MatchConfig, SampleDecoder, SignatureError, SignaturePipeline, read_descriptor,
};
use image::{Rgb, RgbImage};
use tiff::encoder::{TiffEncoder, colortype};

const JPEG_TOLERANCE: f64 = 3.0;

fn solid_jpeg(dir: &std::path::Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([100, 150, 200]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn jpeg_file_to_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = solid_jpeg(dir.path(), "solid.jpg", 320, 200);

    let config = MatchConfig::builder().grid_divisions(16).image_height(128).threads(2).build();
    let pipeline = SignaturePipeline::new(config).unwrap();
    let descriptor = pipeline.signature_file(&path).unwrap();

    assert_eq!(descriptor.column_count(), 20);
    assert_eq!(descriptor.width(), 320);
    assert_eq!(descriptor.blocks_per_column(), 16);

    let expected = pipeline.config().transform(100, 150, 200);
    for block in descriptor.blocks() {
        for (actual, expected) in block.to_array().iter().zip(expected) {
            assert!((actual - expected).abs() < JPEG_TOLERANCE, "{} vs {}", actual, expected);
        }
    }
}

#[test]
fn tiff_file_falls_back_from_raw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.tiff");
    let data = [10u8, 20, 30].repeat(256 * 64);
    let mut file = std::fs::File::create(&path).unwrap();
    TiffEncoder::new(&mut file)
        .unwrap()
        .write_image::<colortype::RGB8>(256, 64, &data)
        .unwrap();
    drop(file);

    let pipeline = SignaturePipeline::new(MatchConfig::default()).unwrap();
    let descriptor = pipeline.signature_file(&path).unwrap();

    assert_eq!(descriptor.column_count(), 16);
    let expected = pipeline.config().transform(10, 20, 30);
    let first = descriptor.columns()[0].blocks()[0].to_array();
    for (actual, expected) in first.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-6);
    }
}

#[test]
fn narrow_jpeg_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = solid_jpeg(dir.path(), "thumb.jpg", 64, 64);

    let pipeline = SignaturePipeline::new(MatchConfig::default()).unwrap();
    let result = pipeline.signature_file(&path);

    assert!(matches!(result, Err(SignatureError::NoDescriptor(_, 64))));
}

#[test]
fn broken_jpeg_reports_decode_failure() {
    let mut truncated = Vec::new();
    RgbImage::from_pixel(256, 128, Rgb([1, 2, 3]))
        .write_to(&mut Cursor::new(&mut truncated), image::ImageFormat::Jpeg)
        .unwrap();
    truncated.truncate(20);

    let result = AutoDecoder.decode(&truncated, 128);
    assert!(matches!(
        result,
        Err(SignatureError::HeaderError(_)) | Err(SignatureError::DecodeError(_))
    ));
}

#[test]
fn half_written_jpeg_builds_no_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.jpg");
    let mut encoded = Vec::new();
    RgbImage::from_fn(512, 256, |x, y| Rgb([(x / 2) as u8, y as u8, 128]))
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Jpeg)
        .unwrap();
    std::fs::write(&path, &encoded[..encoded.len() / 2]).unwrap();

    let pipeline = SignaturePipeline::new(MatchConfig::default()).unwrap();
    let result = pipeline.signature_file(&path);

    assert!(matches!(result, Err(SignatureError::DecodeError(_))));
}

#[test]
fn batch_writes_nothing_for_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = solid_jpeg(dir.path(), "good.jpg", 256, 128);
    let junk = dir.path().join("junk.jpg");
    std::fs::write(&junk, b"not an image").unwrap();

    let pipeline = SignaturePipeline::new(MatchConfig::builder().threads(4).build()).unwrap();
    let entries = pipeline.signature_batch(&[good.clone(), junk.clone()]);

    assert_eq!(entries[0].path, good);
    assert!(entries[0].result.is_ok());
    assert_eq!(entries[1].path, junk);
    assert!(entries[1].result.is_err());
}

#[test]
fn descriptor_file_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let input = solid_jpeg(dir.path(), "wide.jpg", 1000, 300);
    let output = dir.path().join("wide.dsig");

    let config = MatchConfig::builder().grid_divisions(32).image_height(256).build();
    let pipeline = SignaturePipeline::new(config).unwrap();
    let descriptor = pipeline.signature_file_to(&input, &output).unwrap();

    let stored = read_descriptor(&mut std::fs::File::open(&output).unwrap()).unwrap();
    assert_eq!(stored, descriptor);
    // 1000 / 32 = 31 px columns, 32 full plus an 8 px remainder
    assert_eq!(stored.column_count(), 33);
    assert_eq!(stored.columns().last().unwrap().width(), 8);
}
