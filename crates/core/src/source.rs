use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    cache::MediaCache,
    config::RunConfig,
    error::{ClipdeckError, Result},
    tool::{Invocation, ToolRunner},
};

const YT_DLP: &str = "yt-dlp";

pub fn video_url(source_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", source_id)
}

/// `yt-dlp URL -f FORMAT [--verbose] -o OUT`
pub fn download_invocation(source_id: &str, format: &str, out: &Path, verbose: bool) -> Invocation {
    let invocation = Invocation::new(YT_DLP).arg(video_url(source_id)).args(["-f", format]);
    let invocation = if verbose {
        invocation.arg("--verbose")
    } else {
        invocation.arg("--quiet")
    };
    invocation.arg("-o").arg(out)
}

/// Whether the source video is already present locally.
pub fn find_source_in_cache(config: &RunConfig, source_id: &str) -> Option<PathBuf> {
    MediaCache::lookup(&config.source_video_path(source_id))
}

/// Download the source video with yt-dlp unless it is already cached.
pub async fn fetch_source_video<R: ToolRunner>(
    config: &RunConfig,
    source_id: &str,
    runner: &R,
) -> Result<PathBuf> {
    let path = config.source_video_path(source_id);
    if let Some(cached) = MediaCache::lookup(&path) {
        tracing::debug!(%source_id, path = %cached.display(), "source video cached");
        return Ok(cached);
    }

    fs::create_dir_all(&config.cache_root).await?;

    let invocation = download_invocation(source_id, &config.format, &path, config.verbose);
    let failed = |reason: String| ClipdeckError::AcquisitionFailed {
        source_id: source_id.to_string(),
        reason,
    };
    let outcome = runner
        .run(&invocation)
        .await
        .map_err(|e| failed(format!("could not start {}: {}", YT_DLP, e)))?;
    if !outcome.success {
        return Err(failed(outcome.reason()));
    }

    Ok(path)
}
