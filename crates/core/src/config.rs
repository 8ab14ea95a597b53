use std::path::{Path, PathBuf};

/// Default yt-dlp format code (720p video-only mp4).
pub const DEFAULT_FORMAT: &str = "136";

/// Everything a run needs to know, passed explicitly to each stage.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Show external tool output and drop ffmpeg's `-loglevel error`.
    pub verbose: bool,
    /// Still-frame slides only (thumbnail taken at the end of each range).
    pub short: bool,
    /// Emit slides in reverse order.
    pub reverse: bool,
    /// Derive media but do not touch the deck.
    pub dry_run: bool,
    /// yt-dlp format code; also part of the cache layout.
    pub format: String,
    pub cache_root: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            short: false,
            reverse: false,
            dry_run: false,
            format: DEFAULT_FORMAT.to_string(),
            cache_root: get_root_cache_dir(),
        }
    }
}

impl RunConfig {
    /// Per-source cache directory: `<cache_root>/<source_id>/<format>`
    pub fn media_cache_dir(&self, source_id: &str) -> PathBuf {
        self.cache_root
            .join(path_component(source_id))
            .join(path_component(&self.format))
    }

    /// Where the downloaded source video lives
    pub fn source_video_path(&self, source_id: &str) -> PathBuf {
        self.cache_root.join(format!(
            "{}-{}.mp4",
            path_component(source_id),
            path_component(&self.format)
        ))
    }

    /// Output deck file name for a manifest, e.g. `talk.deck.json` or `talk.short.deck.json`
    pub fn deck_file_name(&self, manifest: &Path) -> String {
        let stem = manifest
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "presentation".to_string());
        let extension = if self.short { "short.deck.json" } else { "deck.json" };
        format!("{}.{}", stem, extension)
    }
}

/// One path segment that stays inside its parent: anything outside
/// `[A-Za-z0-9_-]` becomes `_`, so separators, `..` and absolute ids are inert.
fn path_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("clipdeck")
}
