use duplim_rs::image_pipeline::{MatchConfig, SignaturePipeline};
use duplim_rs::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting duplim...");

    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    let config = MatchConfig::builder()
        .grid_divisions(16)
        .image_height(128)
        .threads(threads as i64)
        .build();
    let pipeline = SignaturePipeline::new(config)?;

    info!(
        "Signature pipeline initialized: {} divisions, height {}, {} threads",
        pipeline.config().grid_divisions(),
        pipeline.config().image_height(),
        pipeline.config().threads()
    );

    let paths: Vec<String> = std::env::args().skip(1).collect();
    for entry in pipeline.signature_batch(&paths) {
        match entry.result {
            Ok(descriptor) => info!(
                "{}: {} columns, width {}",
                entry.path.display(),
                descriptor.column_count(),
                descriptor.width()
            ),
            Err(e) => error!("{}: {}", entry.path.display(), e),
        }
    }

    Ok(())
}
