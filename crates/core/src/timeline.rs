use std::fmt;

use crate::instruction::{Instruction, Timestamp};

/// The stretch of media governed by one instruction. `end == None` runs to the
/// end of the media.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Some(start) => write!(f, "{}", start)?,
            None => f.write_str("start")?,
        }
        match &self.end {
            Some(end) => write!(f, "-{}", end),
            None => f.write_str("-end"),
        }
    }
}

/// One visited position: the instruction and the range it covers.
#[derive(Clone, Debug)]
pub struct Step<'a> {
    pub position: usize,
    pub instruction: &'a Instruction,
    pub range: Range,
}

/// The instruction sequence framed by a start and an end sentinel.
///
/// With the sentinels in place every user instruction has a successor, so
/// position `i` always covers `instructions[i].timestamp ..
/// instructions[i + 1].timestamp`. A manifest with `N` instructions yields
/// `N + 1` steps.
#[derive(Clone, Debug)]
pub struct Timeline {
    instructions: Vec<Instruction>,
}

impl Timeline {
    pub fn new(user: Vec<Instruction>) -> Self {
        let mut instructions = Vec::with_capacity(user.len() + 2);
        instructions.push(Instruction::start_sentinel());
        instructions.extend(user);
        instructions.push(Instruction::end_sentinel());
        Self { instructions }
    }

    /// Number of ranges a run visits.
    pub fn len(&self) -> usize {
        self.instructions.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn step(&self, position: usize) -> Option<Step<'_>> {
        let instruction = self.instructions.get(position)?;
        let next = self.instructions.get(position + 1)?;
        Some(Step {
            position,
            instruction,
            range: Range {
                start: instruction.timestamp.clone(),
                end: next.timestamp.clone(),
            },
        })
    }

    /// Steps in emission order. Reversing changes the order only; each range
    /// still ends at its forward successor.
    pub fn steps(&self, reverse: bool) -> impl Iterator<Item = Step<'_>> {
        let positions: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..self.len()).rev())
        } else {
            Box::new(0..self.len())
        };
        positions.filter_map(move |position| self.step(position))
    }
}
