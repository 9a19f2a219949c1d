use std::io::Write as _;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use turntable::{
    BridgeBackend, BridgeOpts, FrameProgress, NoProgress, PipelineConfig, ProgressObserver,
};

#[derive(Parser, Debug)]
#[command(name = "turntable", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every model in every material preset (requires the renderer on PATH).
    Batch,
    /// Render one model in one material preset.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Model identifier (file stem under the models directory).
    #[arg(long)]
    model: String,

    /// Material preset name.
    #[arg(long)]
    material: String,

    /// Correlation id; when set, per-frame progress is printed to stdout as JSON lines.
    #[arg(long = "job-id")]
    job_id: Option<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging();

    let result = match cli.cmd {
        Command::Batch => cmd_batch(),
        Command::Sequence(args) => cmd_sequence(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn cmd_batch() -> anyhow::Result<()> {
    let cfg = PipelineConfig::default();
    let mut backend = BridgeBackend::new(BridgeOpts::from_config(&cfg));
    let report = turntable::generate_all(&cfg, &mut backend, &mut NoProgress)?;

    for failed in &report.failed {
        tracing::warn!(
            model = %failed.model,
            material = failed.material.as_deref().unwrap_or("-"),
            error = %failed.error,
            "not generated"
        );
    }
    tracing::info!(
        sequences = report.sequences.len(),
        failed = report.failed.len(),
        rendered = report.frames_rendered(),
        skipped = report.frames_skipped(),
        "done"
    );
    Ok(())
}

/// Prints each progress event as one JSON line on stdout.
struct JsonLines;

impl ProgressObserver for JsonLines {
    fn on_frame(&mut self, progress: &FrameProgress) {
        let Ok(line) = serde_json::to_string(progress) else {
            return;
        };
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let cfg = PipelineConfig::default();
    let mut backend = BridgeBackend::new(BridgeOpts::from_config(&cfg));

    let mut json = JsonLines;
    let mut quiet = NoProgress;
    let progress: &mut dyn ProgressObserver = if args.job_id.is_some() {
        &mut json
    } else {
        &mut quiet
    };

    let report = turntable::generate_single(
        &cfg,
        &mut backend,
        &args.model,
        &args.material,
        args.job_id.as_deref(),
        progress,
    )?;
    tracing::info!(
        model = %report.model,
        material = %report.material,
        rendered = report.rendered,
        skipped = report.skipped,
        render_failed = report.render_failed,
        placeholders = report.placeholders,
        "done"
    );
    Ok(())
}
