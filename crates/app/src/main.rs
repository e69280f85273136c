use std::fmt;
use std::path::PathBuf;

use services::{AppServices, Clock, ImportOutcome, default_backup_file_name};
use thesis_core::model::{Status, ordered_for_display};
use thesis_core::starter::starter_state;
use thesis_core::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingFile => write!(f, "import requires --file <path>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- overview [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- export   [--db <sqlite_url>] [--file <path>]");
    eprintln!("  cargo run -p app -- import   [--db <sqlite_url>] --file <path>");
    eprintln!("  cargo run -p app -- seed     [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- clear    [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://thesis.sqlite3");
    eprintln!("  export --file thesis-backup-<today>.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  THESIS_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Overview,
    Export,
    Import,
    Seed,
    Clear,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "overview" => Some(Self::Overview),
            "export" => Some(Self::Export),
            "import" => Some(Self::Import),
            "seed" => Some(Self::Seed),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    file: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("THESIS_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://thesis.sqlite3".into(), normalize_sqlite_url);
        let mut file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--file" => {
                    let value = require_value(args, "--file")?;
                    file = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, file })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    // In-memory databases need no file on disk.
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    // Reports go to stdout, so logs stay on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn status_mark(status: Status) -> &'static str {
    match status {
        Status::NotStarted => "[ ]",
        Status::InProgress => "[~]",
        Status::Done => "[x]",
    }
}

fn print_overview(state: &AppState) {
    println!(
        "Thesis progress: {}% ({}/{} units)",
        state.overall_progress(),
        state.completed_units(),
        state.total_units()
    );

    println!();
    println!("Chapters:");
    for chapter in state.chapters() {
        let revision = if chapter.revision().is_some() {
            "  revision saved"
        } else {
            ""
        };
        println!(
            "  {} {:<24} {:>3}%{}",
            status_mark(chapter.status()),
            chapter.title(),
            chapter.progress(),
            revision
        );
    }
    if state.chapters().is_empty() {
        println!("  none yet");
    }

    println!();
    println!("Tasks ({} open):", state.pending_tasks());
    for task in ordered_for_display(state.tasks()) {
        let mark = if task.is_done() { "[x]" } else { "[ ]" };
        let due = task
            .deadline()
            .map(|d| format!("  due {d}"))
            .unwrap_or_default();
        println!("  {} ({}) {}{}", mark, task.priority(), task.text(), due);
    }
    if state.tasks().is_empty() {
        println!("  none yet");
    }

    if !state.projects().is_empty() {
        println!();
        println!("Projects:");
        for project in state.projects() {
            println!(
                "  {} {:<24} {:>3}%",
                status_mark(project.status()),
                project.title(),
                project.progress()
            );
        }
    }
}

fn print_import_outcome(outcome: &ImportOutcome) {
    if outcome.is_empty() {
        println!("import: the document carried no collections");
        return;
    }
    if let Some(count) = outcome.chapters {
        println!("import: {count} chapters");
    }
    if let Some(count) = outcome.tasks {
        println!("import: {count} tasks");
    }
    if let Some(count) = outcome.projects {
        println!("import: {count} projects");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means the overview report.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Overview,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Overview,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let clock = Clock::default_clock();
    tracing::debug!("opening store at {}", parsed.db_url);
    let mut services = AppServices::new_sqlite(&parsed.db_url, clock).await?;
    if services.first_run() {
        tracing::info!("empty store, installed the starter dataset");
    }

    match cmd {
        Command::Overview => {
            print_overview(services.tracker().state());
            Ok(())
        }
        Command::Export => {
            let path = parsed
                .file
                .unwrap_or_else(|| PathBuf::from(default_backup_file_name(clock.now())));
            services.file_sync_mut().create(&path).await?;
            println!("exported to {}", path.display());
            Ok(())
        }
        Command::Import => {
            let path = parsed.file.ok_or(ArgsError::MissingFile)?;
            let outcome = services.file_sync_mut().open(&path).await?;
            services.tracker_mut().rehydrate().await;
            print_import_outcome(&outcome);
            Ok(())
        }
        Command::Seed => {
            services.tracker_mut().replace_state(starter_state()).await?;
            println!("seeded the starter dataset");
            Ok(())
        }
        Command::Clear => {
            services.store().clear_all().await?;
            println!("cleared all documents");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
