use crate::{
    config::RunConfig,
    deck::DeckSink,
    derive::Deriver,
    error::{ClipdeckError, Result},
    instruction::Opcode,
    timeline::{Step, Timeline},
    tool::ToolRunner,
};

/// What a run did, for the final report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ranges visited, sentinels included.
    pub ranges: usize,
    /// `/copy` and `/note` ranges whose media was derived.
    pub derived: usize,
    /// Slides handed to the sink (zero in a dry run).
    pub slides: usize,
    pub notes: usize,
    pub skipped: usize,
    pub unrecognized: usize,
}

/// Walks a timeline, derives media per range and feeds the deck sink.
pub struct Executor<'a, R> {
    config: &'a RunConfig,
    deriver: &'a Deriver<R>,
}

impl<'a, R: ToolRunner> Executor<'a, R> {
    pub fn new(config: &'a RunConfig, deriver: &'a Deriver<R>) -> Self {
        Self { config, deriver }
    }

    /// Run every step in emission order. The first derivation failure aborts
    /// the run; media derived before it stays cached.
    pub async fn run<S: DeckSink>(&self, timeline: &Timeline, sink: &mut S) -> Result<RunSummary> {
        tracing::debug!("Starting to create {} slides", timeline.len());

        let mut summary = RunSummary::default();
        for step in timeline.steps(self.config.reverse) {
            summary.ranges += 1;
            match &step.instruction.opcode {
                Opcode::Copy | Opcode::Note => self.slide(&step, sink, &mut summary).await?,
                Opcode::Skip => {
                    tracing::debug!(position = step.position, "skip");
                    summary.skipped += 1;
                }
                Opcode::Unknown(opcode) => {
                    let warning = ClipdeckError::UnrecognizedOpcode {
                        opcode: opcode.clone(),
                        position: step.position,
                    };
                    tracing::warn!("{}", warning);
                    summary.unrecognized += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn slide<S: DeckSink>(
        &self,
        step: &Step<'_>,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let range = &step.range;
        let clip = self.deriver.clip(range).await?;
        let poster_at = if self.config.short {
            range.end.as_ref()
        } else {
            range.start.as_ref()
        };
        let thumbnail = self.deriver.thumbnail(poster_at).await?;
        summary.derived += 1;
        tracing::debug!(position = step.position, "copy {}", range);

        if self.config.dry_run {
            return Ok(());
        }

        if self.config.short {
            sink.append_image_slide(&thumbnail)?;
        } else {
            sink.append_media_slide(&clip, &thumbnail)?;
        }
        summary.slides += 1;

        if step.instruction.opcode == Opcode::Note {
            tracing::debug!(position = step.position, "also add note");
            sink.attach_note(&step.instruction.note_text())?;
            summary.notes += 1;
        }

        Ok(())
    }
}
