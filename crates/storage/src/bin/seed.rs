use std::fmt;
use std::path::PathBuf;

use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use vocab_core::import::parse_word_list;
use vocab_core::model::normalize_lesson_name;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    lesson_name: String,
    words_file: Option<PathBuf>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLessonName { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLessonName { raw } => write!(f, "invalid --lesson value: {raw:?}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("VOCAB_DB_URL").unwrap_or_else(|_| "sqlite:vocab.sqlite3".into());
        let mut lesson_name =
            std::env::var("VOCAB_LESSON_NAME").unwrap_or_else(|_| "Basics".into());
        let mut words_file = std::env::var("VOCAB_WORDS_FILE").ok().map(PathBuf::from);

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--lesson" => {
                    let value = require_value(&mut args, "--lesson")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidLessonName { raw: value });
                    }
                    lesson_name = value;
                }
                "--words" => {
                    let value = require_value(&mut args, "--words")?;
                    words_file = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            lesson_name,
            words_file,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:vocab.sqlite3)");
    eprintln!("  --lesson <name>           Lesson to create or extend (default: Basics)");
    eprintln!("  --words <path>            File with one `source,target` pair per line");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Without --words a small built-in list is imported.");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  VOCAB_DB_URL, VOCAB_LESSON_NAME, VOCAB_WORDS_FILE");
}

const SAMPLE_WORDS: &str = "\
Hallo,Hello
Danke,Thank you
Bitte,Please
Tschuss,Bye
Guten Morgen,Good morning
";

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    let name = normalize_lesson_name(&args.lesson_name)?;
    let lesson = match storage.lessons.get_lesson_by_name(&name).await? {
        Some(lesson) => lesson,
        None => storage.lessons.insert_lesson(&name).await?,
    };

    let raw = match &args.words_file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => SAMPLE_WORDS.to_string(),
    };
    let parsed = parse_word_list(&raw)?;
    for line in &parsed.failed_lines {
        tracing::warn!(line, "skipping malformed word line");
    }

    let ids = storage.words.insert_words(lesson.id(), &parsed.pairs).await?;

    println!(
        "Seeded lesson {} ({}) with {} words ({} lines skipped) into {}",
        lesson.name(),
        lesson.id(),
        ids.len(),
        parsed.failed(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
