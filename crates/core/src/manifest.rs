use std::path::Path;

use tokio::fs;

use crate::{
    error::{ClipdeckError, Result},
    instruction::{Instruction, Opcode, Timestamp},
};

/// A parsed manifest: the source video id and its instructions in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub source_id: String,
    pub instructions: Vec<Instruction>,
}

/// Parse manifest text.
///
/// The first non-empty line is the source id. Every later line is either a
/// `#` comment, blank, or `<timestamp> <opcode> [args...]` separated by single
/// spaces.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end()));

    let source_id = lines
        .by_ref()
        .find(|(_, line)| !line.is_empty())
        .map(|(_, line)| line.to_string())
        .ok_or(ClipdeckError::MissingSourceId)?;

    let mut instructions = Vec::new();
    for (line_no, line) in lines {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        instructions.push(parse_instruction(line_no, line)?);
    }

    Ok(Manifest {
        source_id,
        instructions,
    })
}

fn parse_instruction(line_no: usize, line: &str) -> Result<Instruction> {
    let mut tokens = line.split(' ');
    let (Some(timestamp), Some(opcode)) = (tokens.next(), tokens.next()) else {
        return Err(ClipdeckError::MalformedInstruction {
            line_no,
            line: line.to_string(),
        });
    };

    Ok(Instruction::new(
        Timestamp::new(timestamp),
        Opcode::parse(opcode),
        tokens.map(str::to_string).collect(),
    ))
}

/// Read and parse a manifest file
pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path).await?;
    parse_manifest(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "VIDEOID\n00:00:00 /skip\n# intro is boring\n00:00:05 /copy\n00:00:10 /note a b\n";

    #[test]
    fn parses_source_id_and_instructions() {
        let manifest = parse_manifest(SAMPLE).unwrap();
        assert_eq!(manifest.source_id, "VIDEOID");
        assert_eq!(manifest.instructions.len(), 3);

        let note = &manifest.instructions[2];
        assert_eq!(note.timestamp, Some(Timestamp::new("00:00:10")));
        assert_eq!(note.opcode, Opcode::Note);
        assert_eq!(note.args, vec!["a".to_string(), "b".to_string()]);
        assert!(manifest.instructions[1].args.is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_manifest(SAMPLE).unwrap(), parse_manifest(SAMPLE).unwrap());
    }

    #[test]
    fn skips_comments_blank_lines_and_carriage_returns() {
        let manifest = parse_manifest("\r\nabc123\r\n\r\n#00:00:01 /copy\r\n00:00:02 /copy\r\n").unwrap();
        assert_eq!(manifest.source_id, "abc123");
        assert_eq!(manifest.instructions.len(), 1);
        assert_eq!(manifest.instructions[0].opcode, Opcode::Copy);
    }

    #[test]
    fn line_without_opcode_is_malformed() {
        let err = parse_manifest("VIDEOID\n00:00:00 /skip\n00:00:05\n").unwrap_err();
        match err {
            ClipdeckError::MalformedInstruction { line_no, line } => {
                assert_eq!(line_no, 3);
                assert_eq!(line, "00:00:05");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_opcode_is_kept_verbatim() {
        let manifest = parse_manifest("VIDEOID\n00:00:05 /zoom 2x\n").unwrap();
        assert_eq!(
            manifest.instructions[0].opcode,
            Opcode::Unknown("/zoom".to_string())
        );
    }

    #[test]
    fn empty_manifest_has_no_source_id() {
        assert!(matches!(
            parse_manifest("\n\n"),
            Err(ClipdeckError::MissingSourceId)
        ));
    }
}
