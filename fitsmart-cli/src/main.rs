use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fitsmart_core::prompt::DOCUMENT_STATUS_MESSAGE;
use fitsmart_core::types::MediaKind;
use fitsmart_core::upload::{Upload, classify_mime};
use fitsmart_engine::orchestrator::Orchestrator;
use fitsmart_engine::session::{SessionState, Step};
use fitsmart_runtime::files::{load_text_routine, load_upload};
use fitsmart_runtime::{build_orchestrator_from_config, load_runtime_config, open_settings};

mod ask;
mod cli;
mod render;

use ask::Asker;
use cli::{AnalyzeArgs, Cli, Commands, ConfigAction, ConfigArgs};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("fitsmart error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    // A missing .env is normal; the environment may already carry the key.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Commands::Personas => {
            print!("{}", render::persona_table());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => config(args),
        Commands::Analyze(args) => analyze(args).await,
    }
}

fn config(args: ConfigArgs) -> anyhow::Result<ExitCode> {
    let store = open_settings(args.settings.as_deref());
    let settings = match args.action {
        ConfigAction::Show => store.load_or_default()?,
        ConfigAction::Set { key, value } => store.update(|s| Ok(s.set(&key, Some(&value))?))?,
        ConfigAction::Unset { key } => store.update(|s| Ok(s.set(&key, None)?))?,
    };
    print!("{}", render::settings(store.path(), &settings));
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FITSMART_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // The library crates log through `log`; the fmt subscriber picks those up too.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn analyze(args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_runtime_config(args.settings.as_deref())?;
    let orchestrator =
        build_orchestrator_from_config(cfg).with_status_hook(|caption| eprintln!("... {caption}"));

    let state = if args.as_text {
        let input = load_text_routine(&args.file)?;
        orchestrator.submit_input(input).await?
    } else {
        let upload = load_upload(&args.file, args.mime.as_deref())?;
        if let Some(caption) = reading_caption(&upload) {
            eprintln!("... {caption}");
        }
        orchestrator.submit_upload(&upload).await?
    };
    if let Some(code) = stop_on_error(&state) {
        return Ok(code);
    }

    if state.step == Step::VideoResults {
        return print_video(&state);
    }

    let stdin = io::stdin();
    let mut asker = Asker::new(stdin.lock(), io::stderr());

    let persona = match args.persona {
        Some(id) => id,
        None => asker.ask_persona()?,
    };
    tracing::info!(persona = %persona, "persona selected");
    let state = orchestrator.select_persona(persona).await?;
    if let Some(code) = stop_on_error(&state) {
        return Ok(code);
    }
    if let Some(pre) = &state.pre_analysis {
        eprint!("{}", render::pre_analysis(pre));
    }

    let answers = asker.complete_answers(&args)?;
    let state = orchestrator.complete_profile(answers).await?;
    if let Some(code) = stop_on_error(&state) {
        return Ok(code);
    }

    print_analysis(&orchestrator, &state).await
}

/// Documents and images get a reading caption; videos report their own progress.
fn reading_caption(upload: &Upload) -> Option<&'static str> {
    (classify_mime(&upload.declared_mime) != MediaKind::Video).then_some(DOCUMENT_STATUS_MESSAGE)
}

fn stop_on_error(state: &SessionState) -> Option<ExitCode> {
    let error = state.error.as_ref()?;
    eprintln!("{}", render::error_banner(error));
    Some(ExitCode::FAILURE)
}

fn print_video(state: &SessionState) -> anyhow::Result<ExitCode> {
    let video = state
        .video
        .as_ref()
        .context("video step reached without a result")?;
    print!("{}", render::video_results(video));
    Ok(ExitCode::SUCCESS)
}

async fn print_analysis(orchestrator: &Orchestrator, state: &SessionState) -> anyhow::Result<ExitCode> {
    let analysis = state
        .analysis
        .as_ref()
        .context("results step reached without an analysis")?;
    print!("{}", render::analysis(analysis));

    let fresh = orchestrator.reset().await?;
    tracing::debug!(generation = fresh.generation, "session closed");
    Ok(ExitCode::SUCCESS)
}
