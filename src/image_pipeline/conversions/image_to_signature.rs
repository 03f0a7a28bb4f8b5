use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    color::MatchConfig,
    common::error::{Result, SignatureError},
    common::timing::{PipelineTimings, Timer},
    decode::{AutoDecoder, SampleDecoder},
    signature::{BinaryDescriptorWriter, DescriptorBuilder, DescriptorWriter, ImageDescriptor},
};

/// Outcome for one path of [`SignaturePipeline::signature_batch`].
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<ImageDescriptor>,
}

pub struct SignaturePipeline<D: SampleDecoder, W: DescriptorWriter> {
    decoder: D,
    writer: W,
    builder: DescriptorBuilder,
}

impl SignaturePipeline<AutoDecoder, BinaryDescriptorWriter> {
    pub fn new(config: impl Into<Arc<MatchConfig>>) -> Result<Self> {
        Self::with_custom(AutoDecoder, BinaryDescriptorWriter, config)
    }
}

impl<D: SampleDecoder, W: DescriptorWriter> SignaturePipeline<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: impl Into<Arc<MatchConfig>>) -> Result<Self> {
        Ok(Self {
            decoder,
            writer,
            builder: DescriptorBuilder::new(config.into())?,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        self.builder.config()
    }

    /// Decodes `input_data` and builds its descriptor under the identifier `source`.
    ///
    /// An image the builder rejects (too narrow, wrong sample height) fails
    /// with [`SignatureError::NoDescriptor`] so batch callers can skip it.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn signature(&self, input_data: &[u8], source: &str) -> Result<ImageDescriptor> {
        self.signature_with_timings(input_data, source)
            .map(|(descriptor, _)| descriptor)
    }

    /// Like [`signature`](Self::signature), also returning the decode and build step timings.
    pub fn signature_with_timings(
        &self,
        input_data: &[u8],
        source: &str,
    ) -> Result<(ImageDescriptor, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let descriptor = self.build_timed(input_data, source, &mut timings)?;
        timings.log_summary();
        Ok((descriptor, timings))
    }

    fn build_timed(
        &self,
        input_data: &[u8],
        source: &str,
        timings: &mut PipelineTimings,
    ) -> Result<ImageDescriptor> {
        let timer = Timer::start("decode");
        let samples = self.decoder.decode(input_data, self.config().image_height())?;
        timings.record(timer);

        let timer = Timer::start("build_descriptor");
        let descriptor = self.builder.build(source, &samples);
        timings.record(timer);

        let descriptor = descriptor.ok_or_else(|| {
            warn!(source, width = samples.width(), "Image rejected, no descriptor built");
            SignatureError::NoDescriptor(source.to_string(), samples.width())
        })?;

        info!(
            "Signature complete: {} columns x {} blocks in {:.3}ms",
            descriptor.column_count(),
            descriptor.blocks_per_column(),
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(descriptor)
    }

    pub fn write(&self, descriptor: &ImageDescriptor, output: &mut dyn Write) -> Result<()> {
        self.writer.write_descriptor(descriptor, output)
    }

    fn read_input(input_path: &Path) -> Result<Vec<u8>> {
        let _span = tracing::info_span!("read_input_file").entered();
        std::fs::read(input_path)
            .map_err(|e| SignatureError::InputReadError(format!("{}: {}", input_path.display(), e)))
    }

    /// Reads and signatures the file at `input_path`, using its displayed path as the source identifier.
    #[instrument(skip(self, input_path), fields(input = %input_path.as_ref().display()))]
    pub fn signature_file<P: AsRef<Path>>(&self, input_path: P) -> Result<ImageDescriptor> {
        let input_path = input_path.as_ref();
        let input_data = Self::read_input(input_path)?;
        self.signature(&input_data, &input_path.display().to_string())
    }

    /// Signatures `input_path` and writes the descriptor to `output_path`.
    pub fn signature_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ImageDescriptor> {
        self.signature_file_to_with_timings(input_path, output_path)
            .map(|(descriptor, _)| descriptor)
    }

    /// Like [`signature_file_to`](Self::signature_file_to); the timings cover decode, build and write.
    #[instrument(skip_all, fields(input = %input_path.as_ref().display()))]
    pub fn signature_file_to_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<(ImageDescriptor, PipelineTimings)> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();
        let input_data = Self::read_input(input_path)?;

        let mut timings = PipelineTimings::new();
        let descriptor = self.build_timed(&input_data, &input_path.display().to_string(), &mut timings)?;

        let timer = Timer::start("write_descriptor");
        let mut output_file = std::fs::File::create(output_path).map_err(|e| {
            SignatureError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        })?;
        self.write(&descriptor, &mut output_file)?;
        timings.record(timer);

        info!(output = %output_path.display(), "Descriptor written");
        timings.log_summary();
        Ok((descriptor, timings))
    }

    /// Signatures every path on the worker pool. Entries are returned in input order.
    pub fn signature_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<BatchEntry> {
        info!("Starting batch of {} images", paths.len());

        let entries: Vec<BatchEntry> = self.builder.install(|| {
            paths
                .par_iter()
                .map(|path| BatchEntry {
                    path: path.as_ref().to_path_buf(),
                    result: self.signature_file(path),
                })
                .collect()
        });

        let failed = entries.iter().filter(|entry| entry.result.is_err()).count();
        info!("Batch complete: {} built, {} skipped", entries.len() - failed, failed);
        entries
    }
}
