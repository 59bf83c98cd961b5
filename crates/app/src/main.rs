use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::{GroupCatalog, GroupId, LimitMode, QuestionLimit, QuizConfig};
use services::loader::source_for;
use services::{AppServices, Clock, QuestionLoader, QuizOptions};
use tracing::info;
use ui::{App, UiApp, build_app_context};

mod play;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLimitMode { raw: String },
    InvalidLimit { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLimitMode { raw } => {
                write!(f, "invalid --limit-mode value: {raw}")
            }
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct CheckFailed {
    failed: usize,
}

impl fmt::Display for CheckFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} group(s) failed to load", self.failed)
    }
}

impl std::error::Error for CheckFailed {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_limit_mode(raw: &str) -> Result<LimitMode, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidLimitMode {
        raw: raw.to_string(),
    })
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [options]");
    eprintln!("  cargo run -p app -- play  [options] [--group <file>]... [--limit <n>]");
    eprintln!("  cargo run -p app -- check [--source <dir|url>] [--catalog <file>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         default sqlite://quiz.sqlite3");
    eprintln!("  --source <dir|url>        default questions");
    eprintln!("  --catalog <file>          JSON list of {{ name, file }}; built-in list otherwise");
    eprintln!("  --limit-mode <mode>       none | adjustable | fixed | fixed:<n>");
    eprintln!("  --no-persist              do not save or resume sessions");
    eprintln!("  --scope <name>            snapshot slot, default \"default\"");
    eprintln!("  --seed <n>                fixed shuffle seed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SOURCE, QUIZ_CATALOG, QUIZ_LIMIT_MODE, QUIZ_PERSIST, QUIZ_SCOPE");
    eprintln!("  RUST_LOG (default info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Play,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "play" => Some(Self::Play),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    source: String,
    catalog: Option<PathBuf>,
    options: QuizOptions,
    groups: Vec<GroupId>,
    limit: Option<QuestionLimit>,
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let mut options = QuizOptions::default();
        if let Ok(raw) = std::env::var("QUIZ_LIMIT_MODE") {
            options.config.limit_mode = parse_limit_mode(&raw)?;
        }
        if let Some(persist) = env_flag("QUIZ_PERSIST") {
            options.config.persist_session = persist;
        }
        if let Ok(scope) = std::env::var("QUIZ_SCOPE") {
            options.scope = scope;
        }

        Ok(Self {
            db_url: std::env::var("QUIZ_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url),
            source: std::env::var("QUIZ_SOURCE").unwrap_or_else(|_| "questions".into()),
            catalog: std::env::var_os("QUIZ_CATALOG").map(PathBuf::from),
            options,
            groups: Vec::new(),
            limit: None,
        })
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--source" => parsed.source = require_value(args, "--source")?,
                "--catalog" => parsed.catalog = Some(require_value(args, "--catalog")?.into()),
                "--limit-mode" => {
                    let value = require_value(args, "--limit-mode")?;
                    parsed.options.config.limit_mode = parse_limit_mode(&value)?;
                }
                "--no-persist" => parsed.options.config.persist_session = false,
                "--scope" => parsed.options.scope = require_value(args, "--scope")?,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.options.seed = Some(seed);
                }
                "--group" if cmd == Command::Play => {
                    parsed.groups.push(GroupId::new(require_value(args, "--group")?));
                }
                "--limit" if cmd == Command::Play => {
                    let value = require_value(args, "--limit")?;
                    let limit: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                    parsed.limit = Some(QuestionLimit::new(limit));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn config(&self) -> QuizConfig {
        self.options.config
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<GroupCatalog, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(GroupCatalog::from_json(&json)?)
        }
        None => Ok(GroupCatalog::builtin()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Without a subcommand the desktop UI is launched.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
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
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let catalog = load_catalog(parsed.catalog.as_ref())?;

    if cmd == Command::Check {
        return check(&parsed.source, &catalog).await;
    }

    prepare_sqlite_file(&parsed.db_url)?;
    let config = parsed.config();
    info!(
        db = %parsed.db_url,
        source = %parsed.source,
        limit_mode = %config.limit_mode,
        persist = config.persist_session,
        "starting quiz"
    );
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        &parsed.source,
        catalog.clone(),
        parsed.options.clone(),
        Clock::default_clock(),
    )
    .await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // Some dev setups default the window to always-on-top.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Medical Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Play => {
            let limit = match parsed.limit {
                Some(limit) => limit,
                None => services.preferences().load().await?.limit,
            };
            play::run(services.quiz_loop(), &catalog, parsed.groups, limit).await?;
            Ok(())
        }
        Command::Check => Ok(()),
    }
}

/// Load every catalog group once and print one line per group.
async fn check(source: &str, catalog: &GroupCatalog) -> Result<(), Box<dyn std::error::Error>> {
    let loader = QuestionLoader::new(source_for(source)?);
    let mut failed = 0;
    for check in loader.check_all(catalog).await {
        match check.outcome {
            Ok(count) => println!("OK {} ({count} questions)", check.group),
            Err(failure) => {
                failed += 1;
                println!("FAIL {}: {failure}", check.group);
            }
        }
    }

    if failed > 0 {
        return Err(CheckFailed { failed }.into());
    }
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
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

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
