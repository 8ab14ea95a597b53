//! Clipdeck Core Library
//!
//! Interprets a timestamped video manifest: cuts a clip and grabs a poster
//! frame for every range with ffmpeg, caches both on disk, and hands the
//! results to a deck sink in order.

pub mod cache;
pub mod config;
pub mod deck;
pub mod derive;
pub mod error;
pub mod executor;
pub mod format;
pub mod instruction;
pub mod manifest;
pub mod pipeline;
pub mod source;
pub mod timeline;
pub mod tool;

// Re-export commonly used items at crate root
pub use cache::{ClipKey, MediaCache, ThumbnailKey};
pub use config::{DEFAULT_FORMAT, RunConfig, get_root_cache_dir};
pub use deck::{Deck, DeckSink, Slide, load_deck, save_deck};
pub use derive::Deriver;
pub use error::{ClipdeckError, Result};
pub use executor::{Executor, RunSummary};
pub use format::format_duration;
pub use instruction::{Instruction, Opcode, Timestamp};
pub use manifest::{Manifest, load_manifest, parse_manifest};
pub use pipeline::build_deck;
pub use source::{fetch_source_video, find_source_in_cache};
pub use timeline::{Range, Step, Timeline};
pub use tool::{Invocation, ProcessRunner, ToolOutcome, ToolRunner, is_on_path};
