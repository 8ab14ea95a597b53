#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use clipdeck_core::{DeckSink, Invocation, Result, RunConfig, ToolOutcome, ToolRunner};

/// Records every invocation and writes an empty file at its output path.
#[derive(Default)]
pub struct StubRunner {
    calls: Mutex<Vec<Invocation>>,
    fail_when: Option<&'static str>,
    write_on_failure: bool,
    dir_on_failure: bool,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any invocation whose output path contains `pattern`.
    pub fn failing_when(pattern: &'static str) -> Self {
        Self {
            fail_when: Some(pattern),
            ..Self::default()
        }
    }

    /// Like `failing_when`, but leave a partial output file behind.
    pub fn failing_with_partial_output(pattern: &'static str) -> Self {
        Self {
            fail_when: Some(pattern),
            write_on_failure: true,
            ..Self::default()
        }
    }

    /// Like `failing_when`, but leave a directory where the output file goes,
    /// so the partial output cannot be removed as a file.
    pub fn failing_with_directory_output(pattern: &'static str) -> Self {
        Self {
            fail_when: Some(pattern),
            dir_on_failure: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ToolRunner for StubRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());

        let out = invocation.output_path().map(Path::to_path_buf);
        let fails = match (self.fail_when, &out) {
            (Some(pattern), Some(out)) => out.to_string_lossy().contains(pattern),
            _ => false,
        };

        if let Some(out) = &out {
            if fails && self.dir_on_failure {
                std::fs::create_dir_all(out)?;
            } else if !fails || self.write_on_failure {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(out, b"")?;
            }
        }

        if fails {
            return Ok(ToolOutcome {
                success: false,
                code: Some(1),
                stderr: "stub failure".to_string(),
            });
        }
        Ok(ToolOutcome::ok())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Media { video: PathBuf, poster: PathBuf },
    Image { image: PathBuf },
    Note(String),
}

/// Deck sink that only remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl DeckSink for RecordingSink {
    fn append_media_slide(&mut self, video: &Path, poster: &Path) -> Result<()> {
        self.calls.push(SinkCall::Media {
            video: video.to_path_buf(),
            poster: poster.to_path_buf(),
        });
        Ok(())
    }

    fn append_image_slide(&mut self, image: &Path) -> Result<()> {
        self.calls.push(SinkCall::Image {
            image: image.to_path_buf(),
        });
        Ok(())
    }

    fn attach_note(&mut self, text: &str) -> Result<()> {
        self.calls.push(SinkCall::Note(text.to_string()));
        Ok(())
    }
}

pub fn config(cache_root: &Path) -> RunConfig {
    RunConfig {
        cache_root: cache_root.to_path_buf(),
        ..RunConfig::default()
    }
}

pub const SCENARIO: &str = "VIDEOID\n00:00:00 /skip\n00:00:05 /copy\n00:00:10 /note a b\n";
