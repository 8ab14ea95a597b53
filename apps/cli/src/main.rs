use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use clipdeck_core::{
    DEFAULT_FORMAT, Deck, ProcessRunner, RunConfig, build_deck, fetch_source_video,
    find_source_in_cache, format_duration, get_root_cache_dir, is_on_path, load_deck,
    load_manifest, save_deck,
};

#[derive(Parser)]
#[command(name = "clipdeck")]
#[command(
    about = "Cut clips and stills from a timestamped video manifest and write a JSON deck description of the slides"
)]
struct Cli {
    /// Presentation manifest used to generate the deck
    #[arg(short, long, default_value = "presentation.md")]
    input: PathBuf,

    /// Existing JSON deck description to append the generated slides to
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Video format to download (136 = 720p).
    /// Other common formats: 401 (2160p), 400 (1440p), 397 (480p), 396 (360p)
    #[arg(short, long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Show ffmpeg/yt-dlp output and debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Only still frames: the last frame of each clip
    #[arg(short, long)]
    short: bool,

    /// Emit slides in reverse order (handy while iterating on the end of a talk)
    #[arg(short, long)]
    reverse: bool,

    /// Derive all media but do not write the deck description
    #[arg(long, visible_alias = "dry-run")]
    no_output: bool,

    /// Directory for the deck description. Defaults to the manifest's directory.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Root of the media cache
    #[arg(long, env = "CLIPDECK_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            verbose: self.verbose,
            short: self.short,
            reverse: self.reverse,
            dry_run: self.no_output,
            format: self.format.clone(),
            cache_root: self.cache_dir.clone().unwrap_or_else(get_root_cache_dir),
        }
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let total_start = Instant::now();
    let config = cli.run_config();

    let manifest_path = std::path::absolute(&cli.input)?;
    if !manifest_path.is_file() {
        fail(format!(
            "Presentation manifest {} does not exist",
            manifest_path.display()
        ));
    }
    let manifest = match load_manifest(&manifest_path).await {
        Ok(manifest) => manifest,
        Err(e) => fail(e),
    };

    if !is_on_path("ffmpeg", "-version") {
        fail("ffmpeg is required but was not found on PATH");
    }

    println!(
        "\n{}  {}\n",
        style("clipdeck").cyan().bold(),
        style("Video Slide Builder").dim()
    );

    let mut deck = match &cli.template {
        Some(template) if template.is_file() => {
            let deck = load_deck(template).await?;
            println!(
                "{} Template loaded: {} slides",
                style("✓").green().bold(),
                deck.len()
            );
            deck
        }
        Some(template) => {
            println!(
                "{} Template {} was not found, continuing without",
                style("!").yellow().bold(),
                style(template.display()).dim()
            );
            Deck::new()
        }
        None => Deck::new(),
    };

    // Step 1: Download (check cache)
    let step_start = Instant::now();
    let video_file = if let Some(cached) = find_source_in_cache(&config, &manifest.source_id) {
        println!(
            "{} Downloaded {}",
            style("✓").green().bold(),
            style("(cached)").dim()
        );
        cached
    } else {
        if !is_on_path("yt-dlp", "--version") {
            fail("yt-dlp is required to download the source video but was not found on PATH");
        }
        let spinner = create_spinner(&format!("Downloading {}...", manifest.source_id));
        let runner = ProcessRunner::new(config.verbose);
        let video = match fetch_source_video(&config, &manifest.source_id, &runner).await {
            Ok(video) => video,
            Err(e) => {
                spinner.finish_and_clear();
                fail(e);
            }
        };
        spinner.finish_with_message(format!(
            "{} Downloaded: {} {}",
            style("✓").green().bold(),
            style(&manifest.source_id).dim(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        video
    };

    // Step 2: Cut clips and thumbnails, fill the deck
    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Creating slides for {} instructions...",
        manifest.instructions.len()
    ));
    let runner = ProcessRunner::new(config.verbose);
    let summary = match build_deck(&config, &manifest, &video_file, &runner, &mut deck).await {
        Ok(summary) => summary,
        Err(e) => {
            spinner.finish_and_clear();
            fail(e);
        }
    };
    spinner.finish_with_message(format!(
        "{} Slides: {} ({} with notes, {} skipped{}) {}",
        style("✓").green().bold(),
        summary.derived,
        summary.notes,
        summary.skipped,
        if summary.unrecognized > 0 {
            format!(", {} unrecognized", summary.unrecognized)
        } else {
            String::new()
        },
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    if config.dry_run {
        println!(
            "\n{} {}\n",
            style("Skipped output due to --no-output.").yellow(),
            style("No deck description was written.").dim()
        );
    } else {
        let output_dir = match &cli.output_dir {
            Some(dir) => dir.clone(),
            None => manifest_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        fs::create_dir_all(&output_dir).await?;
        let output = output_dir.join(config.deck_file_name(&manifest_path));
        save_deck(&deck, &output).await?;
        println!(
            "\n{} {}",
            style("Saved deck description (JSON):").dim(),
            style(output.display()).cyan()
        );
    }

    println!(
        "{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    Ok(())
}
