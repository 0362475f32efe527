mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use cardify::{Separator, SeparatorPreset};
use exporter::{CollectingNotifier, ExportOutcome, Exporter, FsStore};

use crate::settings::{SETTINGS_FILE, Settings};

#[derive(Parser)]
#[command(name = "cardify", version, about = "Split a markdown note into linked card files")]
struct Cli {
    /// Vault directory that note paths are relative to
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Settings file (default: <vault>/.cardify.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this separator preset for this run only
    #[arg(short, long, global = true)]
    separator: Option<SeparatorPreset>,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Anchor every card of a note and write one embed file per card
    Export {
        /// Markdown note, relative to the vault
        file: PathBuf,
    },

    /// Print the number of cards in a note
    Count { file: PathBuf },

    /// Report cards with missing or duplicate anchors
    Check { file: PathBuf },

    /// Print a fresh `^anchor` marker to paste into a note
    Anchor,

    /// Show the active separator, or switch preset with --set
    Separator {
        /// Preset to store: `empty line` or `---`
        #[arg(long)]
        set: Option<SeparatorPreset>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    };
    process::exit(code);
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.vault.join(SETTINGS_FILE));
    let mut settings = Settings::load(&config_path)?;
    let separator = match cli.separator {
        Some(preset) => Separator::preset(preset),
        None => settings.to_separator()?,
    };
    tracing::debug!(separator = separator.name(), config = %config_path.display(), "settings loaded");

    match cli.command {
        Command::Export { file } => {
            let exporter = Exporter::new(FsStore::new(&cli.vault), CollectingNotifier::new(), separator);
            let result = exporter.export(&file);
            for notice in exporter.notifier().take() {
                eprintln!("{}", notice);
            }
            let report = result?;
            if report.outcome == ExportOutcome::Exported {
                println!(
                    "{} created, {} skipped, {} rejected, {} anchor(s) added",
                    report.created.len(),
                    report.skipped.len(),
                    report.rejected.len(),
                    report.anchors_added.len()
                );
            }
            Ok(0)
        }
        Command::Count { file } => {
            let exporter = Exporter::new(FsStore::new(&cli.vault), CollectingNotifier::new(), separator);
            println!("{}", exporter.count(&file)?);
            Ok(0)
        }
        Command::Check { file } => do_check(&cli.vault, &file, &separator, cli.no_color),
        Command::Anchor => {
            println!("{}", cardify::anchor::insert_anchor(&mut rand::rng()));
            Ok(0)
        }
        Command::Separator { set } => {
            if let Some(preset) = set {
                settings.select(preset);
                settings.save(&config_path)?;
                eprintln!("ok: separator set to '{}' in {}", preset, config_path.display());
            }
            let kind = if settings.preset().is_some() { "preset" } else { "custom" };
            println!("{}\t{}\t({})", settings.separator_name, settings.separator, kind);
            Ok(0)
        }
    }
}

fn do_check(vault: &Path, file: &Path, separator: &Separator, no_color: bool) -> anyhow::Result<i32> {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let path = vault.join(file);
    let source = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("cannot read '{}': {}", path.display(), e))?;

    let findings = cardify::lint::check(&source, separator);

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.display().to_string(), source);
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for finding in &findings {
        let diagnostic = finding.to_diagnostic(file_id);
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }

    if findings.iter().any(|f| f.is_error()) {
        return Ok(1);
    }
    if findings.is_empty() {
        eprintln!("ok: {} has no anchor problems", file.display());
    }
    Ok(0)
}
