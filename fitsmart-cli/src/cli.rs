use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fitsmart_core::persona::PersonaId;

/// Top-level CLI parser for the `fitsmart` binary.
#[derive(Debug, Parser)]
#[command(
    name = "fitsmart",
    version,
    about = "FitSmart - biomechanical review of training routines"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a routine (image, PDF or video) or a technique video.
    Analyze(AnalyzeArgs),
    /// List the available coach personas.
    Personas,
    /// Show or edit the settings file.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,

    /// JSON settings file (defaults to ./fitsmart.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print every setting and its current value.
    Show,
    /// Set one setting, e.g. `deep_model gemini-2.5-pro`.
    Set { key: String, value: String },
    /// Clear one setting so the built-in default applies.
    Unset { key: String },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// File to analyze
    pub file: PathBuf,

    /// Declared MIME type (guessed from the extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Send the file contents as a plain-text routine
    #[arg(long, conflicts_with = "mime")]
    pub as_text: bool,

    /// Coach persona: sara, todor or raul
    #[arg(long)]
    pub persona: Option<PersonaId>,

    /// Training experience
    #[arg(long)]
    pub experience: Option<String>,

    /// Training goal
    #[arg(long)]
    pub goal: Option<String>,

    /// Injuries or limitations
    #[arg(long)]
    pub injuries: Option<String>,

    /// Anything else the coach should know
    #[arg(long)]
    pub answer: Option<String>,

    /// JSON settings file (defaults to ./fitsmart.json)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, ConfigAction};
    use fitsmart_core::persona::PersonaId;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_profile_flags() {
        let cli = Cli::try_parse_from([
            "fitsmart",
            "-v",
            "analyze",
            "rutina.pdf",
            "--persona",
            "Raul",
            "--experience",
            "intermedio",
            "--injuries",
            "ninguna",
        ])
        .expect("cli should parse");

        assert!(cli.verbose);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.file.to_str(), Some("rutina.pdf"));
        assert_eq!(args.persona, Some(PersonaId::Raul));
        assert_eq!(args.experience.as_deref(), Some("intermedio"));
        assert_eq!(args.goal, None);
        assert!(!args.as_text);
    }

    #[test]
    fn unknown_persona_is_rejected() {
        let err = Cli::try_parse_from(["fitsmart", "analyze", "x.png", "--persona", "pepe"]);
        assert!(err.is_err());
    }

    #[test]
    fn as_text_conflicts_with_mime() {
        let err = Cli::try_parse_from([
            "fitsmart",
            "analyze",
            "plan.txt",
            "--as-text",
            "--mime",
            "image/png",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn personas_subcommand_parses() {
        let cli = Cli::try_parse_from(["fitsmart", "personas"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Personas));
    }

    #[test]
    fn config_set_parses_key_value_and_settings_path() {
        let cli = Cli::try_parse_from([
            "fitsmart",
            "config",
            "set",
            "fast_model",
            "gemini-2.5-flash",
            "--settings",
            "conf/fitsmart.json",
        ])
        .expect("cli should parse");

        let Commands::Config(args) = cli.command else {
            panic!("expected config");
        };
        assert_eq!(args.settings.as_deref().and_then(|p| p.to_str()), Some("conf/fitsmart.json"));
        match args.action {
            ConfigAction::Set { key, value } => {
                assert_eq!(key, "fast_model");
                assert_eq!(value, "gemini-2.5-flash");
            }
            other => panic!("expected set, got {other:?}"),
        }
    }
}
