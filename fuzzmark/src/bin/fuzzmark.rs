//! Command-line front end.
//!
//! Usage:
//!     fuzzmark index --db index.db --id notes notes.txt
//!     fuzzmark find "quikc brown" --file notes.txt
//!     fuzzmark find "quikc brown" --db index.db --id notes --consecutive --json

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fuzzmark::{render_marks, FindOptions, IndexDatabase, MemoryStore, SeekOptions, Seeker};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fuzzmark", about = "Fuzzy full-text search with highlight marks")]
struct Cli {
    /// JSON options file (`similarity`, `n-gram`, `match-prefix`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum word similarity, overrides the config file
    #[arg(long, global = true)]
    similarity: Option<f64>,

    /// Gram size, overrides the config file
    #[arg(long, global = true)]
    ngram: Option<usize>,

    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a text file into a SQLite store
    Index {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        id: String,
        file: PathBuf,
    },
    /// Search files or stored documents
    Find(FindArgs),
}

#[derive(Args)]
struct FindArgs {
    query: String,
    /// Text files, indexed on the fly
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    /// SQLite store to read documents from
    #[arg(long)]
    db: Option<PathBuf>,
    /// Stored document ids (with --db)
    #[arg(long = "id")]
    ids: Vec<String>,
    #[arg(long)]
    exact: bool,
    #[arg(long)]
    consecutive: bool,
    /// Omit documents without any match
    #[arg(long)]
    matched_only: bool,
    /// Print hits as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;
    let locale = cli.locale.clone();

    match cli.command {
        Command::Index { db, id, file } => {
            let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let database = IndexDatabase::open(&db).with_context(|| format!("opening {}", db.display()))?;
            let seeker = Seeker::new(options)?.with_store(database);
            let index = seeker.index(&text, Some(&id), locale.as_deref())?;
            println!("indexed {} ({} grams)", id, index.len());
        }
        Command::Find(args) => find(options, locale, args)?,
    }
    Ok(())
}

fn load_options(cli: &Cli) -> Result<SeekOptions> {
    let mut options = match &cli.config {
        Some(path) => SeekOptions::load(path)?,
        None => SeekOptions::default(),
    };
    if let Some(similarity) = cli.similarity {
        options.similarity = similarity;
    }
    if let Some(ngram) = cli.ngram {
        options.ngram = ngram;
    }
    Ok(options)
}

fn find(options: SeekOptions, locale: Option<String>, args: FindArgs) -> Result<()> {
    let find_options = FindOptions {
        exact: args.exact,
        consecutive: args.consecutive,
        locale: locale.clone(),
        matched_only: args.matched_only,
    };

    let (seeker, documents, texts) = match (&args.db, args.files.is_empty()) {
        (Some(db), true) => {
            if args.ids.is_empty() {
                bail!("--db needs at least one --id");
            }
            let database = IndexDatabase::open(db).with_context(|| format!("opening {}", db.display()))?;
            let texts: Vec<Option<String>> = vec![None; args.ids.len()];
            (Seeker::new(options)?.with_store(database), args.ids.clone(), texts)
        }
        (None, false) => {
            let store = Arc::new(MemoryStore::new());
            let seeker = Seeker::new(options)?.with_shared_store(store);
            let mut documents = Vec::with_capacity(args.files.len());
            let mut texts = Vec::with_capacity(args.files.len());
            for file in &args.files {
                let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
                let id = file.display().to_string();
                seeker.index(&text, Some(&id), locale.as_deref())?;
                documents.push(id);
                texts.push(Some(text));
            }
            (seeker, documents, texts)
        }
        _ => bail!("pass either --file paths or --db with --id"),
    };

    let hits = seeker.find(documents.as_slice(), &args.query, &find_options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    for hit in &hits {
        println!("[{}] score {:.2}", hit.document, hit.score);
        let text = documents
            .iter()
            .position(|d| *d == hit.document)
            .and_then(|i| texts[i].as_deref());
        if let Some(text) = text {
            println!("{}\n", render_marks(text, &hit.marks, "**", "**"));
        }
    }
    Ok(())
}
