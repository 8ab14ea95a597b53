use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipdeckError {
    #[error("Manifest is empty: the first line must name the source video")]
    MissingSourceId,

    #[error("Malformed instruction on line {line_no}: \"{line}\" (expected \"<timestamp> <opcode> [args...]\")")]
    MalformedInstruction { line_no: usize, line: String },

    #[error("Unknown instruction \"{opcode}\" at position {position} is treated as /skip")]
    UnrecognizedOpcode { opcode: String, position: usize },

    #[error("Download failed for {source_id}: {reason}")]
    AcquisitionFailed { source_id: String, reason: String },

    #[error("Creating {artifact} {target} failed: {reason}")]
    DerivationFailed {
        artifact: &'static str,
        target: PathBuf,
        reason: String,
    },

    #[error("Cannot attach a note: the deck has no slides yet")]
    NoSlideForNote,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClipdeckError>;
