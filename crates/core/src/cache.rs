use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{error::Result, instruction::Timestamp, timeline::Range};

/// Separates start and end in a clip key. `Timestamp::file_stem` never emits it.
const RANGE_SEPARATOR: char = '~';

/// Prefix for fixed key names. `Timestamp::file_stem` never emits it.
const FIXED_PREFIX: char = '@';

/// Cache key for a clip: the normalized (start, end) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipKey(String);

impl ClipKey {
    pub fn for_range(range: &Range) -> Self {
        let start = range
            .start
            .as_ref()
            .map(Timestamp::file_stem)
            .unwrap_or_else(|| format!("{}start", FIXED_PREFIX));
        let end = range
            .end
            .as_ref()
            .map(Timestamp::file_stem)
            .unwrap_or_else(|| format!("{}end", FIXED_PREFIX));
        Self(format!("{}{}{}", start, RANGE_SEPARATOR, end))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cache key for a thumbnail; `None` selects the last frame of the media.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThumbnailKey(String);

impl ThumbnailKey {
    pub fn at(timestamp: Option<&Timestamp>) -> Self {
        match timestamp {
            Some(ts) => Self(ts.file_stem()),
            None => Self(format!("{}last", FIXED_PREFIX)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// On-disk store of derived clips and thumbnails for one source and format.
///
/// A file that exists at a key's path is a valid entry; nothing is ever
/// invalidated.
#[derive(Clone, Debug)]
pub struct MediaCache {
    dir: PathBuf,
}

impl MediaCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the cache, creating its directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let cache = Self::new(dir);
        fs::create_dir_all(&cache.dir).await?;
        Ok(cache)
    }

    pub fn clip_path(&self, key: &ClipKey) -> PathBuf {
        self.dir.join(format!("{}.mp4", key.as_str()))
    }

    pub fn thumbnail_path(&self, key: &ThumbnailKey) -> PathBuf {
        self.dir.join(format!("{}.jpg", key.as_str()))
    }

    /// Return the path if an entry is already present
    pub fn lookup(path: &Path) -> Option<PathBuf> {
        path.is_file().then(|| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: Option<&str>) -> Range {
        Range {
            start: Some(Timestamp::new(start)),
            end: end.map(Timestamp::new),
        }
    }

    #[test]
    fn clip_names_follow_the_range() {
        let cache = MediaCache::new("/cache/abc/136");
        let key = ClipKey::for_range(&range("00:00:05", Some("00:00:10")));
        assert_eq!(
            cache.clip_path(&key),
            PathBuf::from("/cache/abc/136/00.00.05~00.00.10.mp4")
        );

        let open_ended = ClipKey::for_range(&range("00:00:10", None));
        assert_eq!(open_ended.as_str(), "00.00.10~@end");
    }

    #[test]
    fn last_frame_thumbnail_has_its_own_key() {
        let cache = MediaCache::new("/cache");
        assert_eq!(
            cache.thumbnail_path(&ThumbnailKey::at(None)),
            PathBuf::from("/cache/@last.jpg")
        );
        let literal = Timestamp::new("last");
        assert_ne!(ThumbnailKey::at(None), ThumbnailKey::at(Some(&literal)));
        let ts = Timestamp::new("00:00:05");
        assert_eq!(
            cache.thumbnail_path(&ThumbnailKey::at(Some(&ts))),
            PathBuf::from("/cache/00.00.05.jpg")
        );
    }

    #[test]
    fn clip_keys_do_not_collide_on_dashes() {
        let a = ClipKey::for_range(&range("1-2", Some("3")));
        let b = ClipKey::for_range(&range("1", Some("2-3")));
        assert_ne!(a, b);

        let open_ended = ClipKey::for_range(&range("1", None));
        let literal_end = ClipKey::for_range(&range("1", Some("end")));
        assert_ne!(open_ended, literal_end);
    }

    #[test]
    fn lookup_only_hits_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MediaCache::new(dir.path());
        let path = cache.thumbnail_path(&ThumbnailKey::at(None));
        assert_eq!(MediaCache::lookup(&path), None);

        std::fs::write(&path, b"jpg").unwrap();
        assert_eq!(MediaCache::lookup(&path), Some(path.clone()));
    }
}
