use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    cache::{ClipKey, MediaCache, ThumbnailKey},
    config::RunConfig,
    error::{ClipdeckError, Result},
    instruction::Timestamp,
    timeline::Range,
    tool::{Invocation, ToolRunner},
};

const FFMPEG: &str = "ffmpeg";

/// How far before the end of the media ffmpeg seeks for the last frame.
const LAST_FRAME_OFFSET: &str = "-0.3";

/// Cuts clips and grabs thumbnails from the source video, cache first.
pub struct Deriver<R> {
    runner: R,
    cache: MediaCache,
    video: PathBuf,
    verbose: bool,
}

impl<R: ToolRunner> Deriver<R> {
    pub fn new(
        config: &RunConfig,
        cache: MediaCache,
        video: impl Into<PathBuf>,
        runner: R,
    ) -> Self {
        Self {
            runner,
            cache,
            video: video.into(),
            verbose: config.verbose,
        }
    }

    /// Produce the clip for `range`, invoking ffmpeg only on a cache miss
    pub async fn clip(&self, range: &Range) -> Result<PathBuf> {
        let path = self.cache.clip_path(&ClipKey::for_range(range));
        if let Some(hit) = MediaCache::lookup(&path) {
            tracing::debug!(%range, path = %hit.display(), "clip cached");
            return Ok(hit);
        }

        let invocation = clip_invocation(&self.video, range, &path, self.verbose);
        self.invoke("clip", &invocation, &path).await?;
        tracing::info!(%range, path = %path.display(), "created clip");
        Ok(path)
    }

    /// Produce a single frame at `timestamp`, or the last frame when `None`
    pub async fn thumbnail(&self, timestamp: Option<&Timestamp>) -> Result<PathBuf> {
        let path = self.cache.thumbnail_path(&ThumbnailKey::at(timestamp));
        if let Some(hit) = MediaCache::lookup(&path) {
            tracing::debug!(path = %hit.display(), "thumbnail cached");
            return Ok(hit);
        }

        let invocation = thumbnail_invocation(&self.video, timestamp, &path, self.verbose);
        self.invoke("thumbnail", &invocation, &path).await?;
        tracing::info!(path = %path.display(), "created thumbnail");
        Ok(path)
    }

    async fn invoke(
        &self,
        artifact: &'static str,
        invocation: &Invocation,
        path: &Path,
    ) -> Result<()> {
        let failed = |reason: String| ClipdeckError::DerivationFailed {
            artifact,
            target: path.to_path_buf(),
            reason,
        };

        let outcome = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| failed(format!("could not start {}: {}", invocation.program, e)))?;

        if !outcome.success {
            // partial output must not become a cache entry
            if fs::try_exists(path).await.unwrap_or(false) {
                if let Err(e) = fs::remove_file(path).await {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
                }
            }
            return Err(failed(outcome.reason()));
        }

        Ok(())
    }
}

fn ffmpeg(verbose: bool) -> Invocation {
    let invocation = Invocation::new(FFMPEG).arg("-y");
    if verbose {
        invocation
    } else {
        invocation.args(["-loglevel", "error"])
    }
}

/// `ffmpeg -y [-loglevel error] -ss START [-to END] -i VIDEO OUT`
pub fn clip_invocation(video: &Path, range: &Range, out: &Path, verbose: bool) -> Invocation {
    let mut invocation = ffmpeg(verbose);
    if let Some(start) = &range.start {
        invocation = invocation.args(["-ss", start.as_str()]);
    }
    if let Some(end) = &range.end {
        invocation = invocation.args(["-to", end.as_str()]);
    }
    invocation.arg("-i").arg(video).arg(out)
}

/// One frame at `timestamp`, or the last decodable frame when `None`.
pub fn thumbnail_invocation(
    video: &Path,
    timestamp: Option<&Timestamp>,
    out: &Path,
    verbose: bool,
) -> Invocation {
    let invocation = ffmpeg(verbose);
    match timestamp {
        Some(ts) => invocation
            .args(["-ss", ts.as_str()])
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1"])
            .arg(out),
        None => invocation
            .args(["-sseof", LAST_FRAME_OFFSET])
            .arg("-i")
            .arg(video)
            .args(["-qscale:v", "2", "-update", "1"])
            .arg(out),
    }
}
