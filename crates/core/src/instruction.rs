use std::fmt;

/// A seek position in whatever syntax ffmpeg accepts (e.g. `00:01:30`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-name safe form: `:` becomes `.`, anything outside `[A-Za-z0-9._-]` becomes `_`.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| match c {
                ':' => '.',
                c if c.is_ascii_alphanumeric() || c == '.' || c == '-' => c,
                _ => '_',
            })
            .collect()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    Copy,
    Note,
    Skip,
    Unknown(String),
}

impl Opcode {
    pub fn parse(token: &str) -> Self {
        match token {
            "/copy" => Opcode::Copy,
            "/note" => Opcode::Note,
            "/skip" => Opcode::Skip,
            other => Opcode::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Copy => f.write_str("/copy"),
            Opcode::Note => f.write_str("/note"),
            Opcode::Skip => f.write_str("/skip"),
            Opcode::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// One manifest directive. `timestamp == None` means end of media and only
/// occurs on the trailing sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub timestamp: Option<Timestamp>,
    pub opcode: Opcode,
    pub args: Vec<String>,
}

impl Instruction {
    pub fn new(timestamp: Timestamp, opcode: Opcode, args: Vec<String>) -> Self {
        Self {
            timestamp: Some(timestamp),
            opcode,
            args,
        }
    }

    /// Leading sentinel: a skip at the start of the media.
    pub fn start_sentinel() -> Self {
        Self::new(Timestamp::new("00:00:00"), Opcode::Skip, Vec::new())
    }

    /// Trailing sentinel: a skip at end of media.
    pub fn end_sentinel() -> Self {
        Self {
            timestamp: None,
            opcode: Opcode::Skip,
            args: Vec::new(),
        }
    }

    pub fn note_text(&self) -> String {
        self.args.join(" ")
    }
}
