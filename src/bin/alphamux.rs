use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "alphamux", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mux a grayscale alpha WebM into a color WebM.
    Mux(MuxArgs),
    /// Encode a directory of PNG frames to a transparent WebM under a size budget.
    Fit(FitArgs),
    /// Convert an animated GIF to a transparent WebM under a size budget.
    Convert(ConvertArgs),
    /// Print the element tree of a WebM file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct MuxArgs {
    /// Color stream (VP9 WebM).
    #[arg(long)]
    color: PathBuf,

    /// Alpha stream (VP9 WebM, grayscale).
    #[arg(long)]
    alpha: PathBuf,

    /// Output WebM path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BudgetArgs {
    /// Output profile.
    #[arg(long, value_enum, default_value_t = ProfileChoice::Sticker)]
    profile: ProfileChoice,

    /// Override the profile's size budget (KiB).
    #[arg(long = "budget-kb")]
    budget_kb: Option<u64>,

    /// Search tuning JSON (missing fields use defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// `ffmpeg` executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Directory of RGBA PNG frames, encoded in file name order.
    #[arg(long)]
    frames: PathBuf,

    /// Source frame rate (`30`, `30000/1001`, `12.5`).
    #[arg(long)]
    fps: alphamux::Fps,

    /// Output WebM path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    budget: BudgetArgs,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input animated GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WebM path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the fitted frames as PNGs into this directory.
    #[arg(long)]
    keep_frames: Option<PathBuf>,

    #[command(flatten)]
    budget: BudgetArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// WebM/Matroska file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileChoice {
    Sticker,
    Emoji,
}

impl From<ProfileChoice> for alphamux::StickerKind {
    fn from(choice: ProfileChoice) -> Self {
        match choice {
            ProfileChoice::Sticker => Self::Sticker,
            ProfileChoice::Emoji => Self::Emoji,
        }
    }
}

impl BudgetArgs {
    fn resolve(
        &self,
    ) -> anyhow::Result<(alphamux::Profile, alphamux::SearchConfig, alphamux::VpxOptions)> {
        let mut profile = alphamux::Profile::for_kind(self.profile.into());
        if let Some(kb) = self.budget_kb {
            anyhow::ensure!(kb > 0, "--budget-kb must be positive");
            profile = profile
                .with_budget_kib(kb)
                .with_context(|| format!("--budget-kb {kb} is too large"))?;
        }
        let cfg = match &self.config {
            Some(path) => alphamux::SearchConfig::from_json_file(path)?,
            None => alphamux::SearchConfig::default(),
        };
        let opts = alphamux::VpxOptions {
            ffmpeg: self.ffmpeg.clone(),
            ..alphamux::VpxOptions::default()
        };
        Ok((profile, cfg, opts))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Mux(args) => cmd_mux(args),
        Command::Fit(args) => cmd_fit(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_mux(args: MuxArgs) -> anyhow::Result<()> {
    let report = alphamux::mux_files(&args.color, &args.alpha, &args.out)?;
    if report.unmatched_blocks > 0 {
        eprintln!(
            "warning: {} color blocks had no alpha frame",
            report.unmatched_blocks
        );
    }
    eprintln!(
        "wrote {} ({} blocks with alpha)",
        args.out.display(),
        report.converted_blocks
    );
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let (profile, cfg, opts) = args.budget.resolve()?;
    let mut frames = alphamux::FrameSequence::load_dir(&args.frames)?;
    frames.truncate_to_duration(args.fps, profile.max_duration_secs);

    let outcome = alphamux::fit_frames(
        frames,
        args.fps,
        profile.canvas,
        profile.budget_bytes,
        &cfg,
        opts,
    )?;
    write_outcome(&args.out, &outcome, profile.budget_bytes)
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let (profile, cfg, opts) = args.budget.resolve()?;
    let (frames, fps) = alphamux::FrameSequence::from_gif(
        &args.in_path,
        profile.canvas,
        profile.max_duration_secs,
    )?;
    if let Some(dir) = &args.keep_frames {
        let written = frames.save_pngs(dir)?;
        eprintln!("wrote {} frames to {}", written.len(), dir.display());
    }

    let outcome = alphamux::fit_frames(
        frames,
        fps,
        profile.canvas,
        profile.budget_bytes,
        &cfg,
        opts,
    )?;
    write_outcome(&args.out, &outcome, profile.budget_bytes)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let doc = alphamux::Document::parse(bytes)?;
    print!("{}", doc.describe());
    Ok(())
}

fn write_outcome(out: &Path, outcome: &alphamux::FitOutcome, budget: u64) -> anyhow::Result<()> {
    alphamux::ensure_parent_dir(out)?;
    std::fs::write(out, &outcome.bytes)
        .with_context(|| format!("write webm '{}'", out.display()))?;

    if !outcome.within_budget {
        eprintln!(
            "warning: no setting fit {budget} bytes; wrote smallest result ({} bytes)",
            outcome.size()
        );
    }
    eprintln!(
        "wrote {} ({} bytes, {} after {} attempts)",
        out.display(),
        outcome.size(),
        outcome.candidate,
        outcome.attempts
    );
    Ok(())
}
