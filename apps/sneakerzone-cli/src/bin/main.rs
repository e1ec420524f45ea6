use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use sneakerzone_core::config::{expand_os_path, expand_path, resolve_with_base, Config};
use sneakerzone_core::{CatalogIndex, IngestionTally};
use sneakerzone_ingest::{EntryOutcome, FsAccess, IngestError, IngestObserver, Ingestor};
use sneakerzone_render::{summary_line, CardSink, JsonSink};

#[derive(Parser)]
#[command(name = "sneakerzone", about = "Build a product catalog from a folder of named product photos")]
struct Cli {
    /// Folders to load, one after another, into the same catalog.
    dirs: Vec<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Directory holding sneakerzone.toml.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

struct Spinner(ProgressBar);

impl Spinner {
    fn new(dir: &Path) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}") {
            pb.set_style(style);
        }
        pb.set_message(dir.display().to_string());
        Self(pb)
    }
}

impl IngestObserver for Spinner {
    fn on_entry(&mut self, name: &str, outcome: &EntryOutcome) {
        self.0.inc(1);
        if let EntryOutcome::Accepted(key) = outcome {
            self.0.set_message(format!("{key} ← {name}"));
        }
    }

    fn on_complete(&mut self, index: &CatalogIndex, tally: &IngestionTally) {
        self.0.finish_and_clear();
        tracing::info!(buckets = index.len(), records = index.record_count(), accepted = tally.accepted, "catalog refreshed");
    }
}

/// Empty answer means the user backed out of choosing a folder.
fn prompt_for_dir() -> anyhow::Result<Option<PathBuf>> {
    eprint!("Carpeta a cargar (Inventario_Marcas), vacío para cancelar: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| expand_path(line)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config_dir)
        .map_err(|e| { eprintln!("Error loading config: {}", e); e })?;

    let log = config.log()?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let settings = config.catalog()?;
    let mut dirs: Vec<PathBuf> = cli.dirs.iter().map(|d| expand_os_path(d)).collect();
    if dirs.is_empty() {
        match settings.root_dir.as_deref() {
            Some(dir) => dirs.push(resolve_with_base(&cli.config_dir, dir)),
            None => match prompt_for_dir()? {
                Some(dir) => dirs.push(dir),
                None => {
                    eprintln!("{}", summary_line(&IngestionTally::default()));
                    return Ok(());
                }
            },
        }
    }

    let mut index = settings.build_index();
    let access = FsAccess::new();
    for dir in &dirs {
        let run = if cli.quiet {
            Ingestor::new(&access).run(dir, &mut index)
        } else {
            let mut spinner = Spinner::new(dir);
            let run = Ingestor::new(&access).with_observer(&mut spinner).run(dir, &mut index);
            spinner.0.finish_and_clear();
            run
        };
        match run {
            Ok(tally) => eprintln!("{}: {}", dir.display(), summary_line(&tally)),
            Err(IngestError::Aborted(reason)) => {
                tracing::error!(dir = %dir.display(), error = %reason, "folder not loaded");
                eprintln!("No se pudo leer la carpeta {}.", dir.display());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let stdout = io::stdout();
    match cli.format {
        Format::Text => {
            let mut sink = CardSink::new();
            index.project(&mut sink);
            write!(stdout.lock(), "{}", sink.into_string())?;
        }
        Format::Json => {
            let mut sink = JsonSink::new();
            index.project(&mut sink);
            sink.write_to(stdout.lock())?;
            println!();
        }
    }
    Ok(())
}
