use std::path::Path;

use crate::{
    cache::MediaCache,
    config::RunConfig,
    deck::DeckSink,
    derive::Deriver,
    error::Result,
    executor::{Executor, RunSummary},
    manifest::Manifest,
    timeline::Timeline,
    tool::ToolRunner,
};

/// Turn a parsed manifest into slides on `sink`, deriving media from `video`.
///
/// The media cache lives under `config.media_cache_dir(source_id)` and is
/// created on first use.
pub async fn build_deck<R: ToolRunner, S: DeckSink>(
    config: &RunConfig,
    manifest: &Manifest,
    video: &Path,
    runner: R,
    sink: &mut S,
) -> Result<RunSummary> {
    let cache = MediaCache::open(config.media_cache_dir(&manifest.source_id)).await?;
    let deriver = Deriver::new(config, cache, video, runner);
    let timeline = Timeline::new(manifest.instructions.clone());

    Executor::new(config, &deriver).run(&timeline, sink).await
}
