mod aggregate;
mod model;
mod report;
mod sources;
mod text;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use sources::almaany::Almaany;
use sources::elixir::Elixir;
use sources::hanswehr::HansWehr;
use sources::perplexity::Perplexity;
use sources::{Registry, SourceError, SourceId};
use text::verb_forms::VerbForms;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:131.0) Gecko/20100101 Firefox/131.0";

/// Look an Arabic word up across web dictionaries, a local Hans Wehr
/// database and an LLM, and print the merged answers.
#[derive(Parser)]
#[command(name = "sahib", version, about)]
struct Cli {
    /// The word to look up, with or without harakat.
    word: String,

    /// Sources to query, in display order.
    #[arg(long, value_delimiter = ',', default_value = "almaany,elixir,hanswehr,perplexity")]
    sources: Vec<SourceId>,

    /// Path to the Hans Wehr SQLite database.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Per-source deadline in seconds.
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Target language for the LLM translation and examples.
    #[arg(long, default_value = "french")]
    lang: String,

    /// How many example sentences to ask the LLM for.
    #[arg(long, default_value_t = 5)]
    examples: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sahib=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    let mut registry = Registry::new();
    registry.register(SourceId::Almaany, Arc::new(Almaany::new(http.clone())));
    registry.register(SourceId::Elixir, Arc::new(Elixir::new(http.clone())));

    let dictionary = match &cli.db {
        Some(path) => {
            let dict = Arc::new(HansWehr::open(path, VerbForms::table())?);
            registry.register(SourceId::HansWehr, dict.clone());
            Some(dict)
        }
        None => None,
    };

    match Perplexity::from_env(http, &cli.lang, cli.examples) {
        Ok(llm) => registry.register(SourceId::Perplexity, Arc::new(llm)),
        Err(SourceError::ApiKeyNotSet) => {
            warn!("PERPLEXITY_API_KEY not set, perplexity source disabled");
        }
        Err(e) => return Err(e.into()),
    }

    info!(word = %cli.word, "searching");
    let enabled = registry.select(&cli.sources);
    let results = aggregate::aggregate(&cli.word, &enabled, Duration::from_secs(cli.timeout)).await;

    let definitions = match &dictionary {
        Some(dict) if cli.sources.contains(&SourceId::HansWehr) => {
            match dict.definitions(&cli.word).await {
                Ok(set) => Some(set),
                Err(e) => {
                    // Treated as "no definitions found", never fatal.
                    warn!(error = %e, "hans wehr lookup failed");
                    None
                }
            }
        }
        _ => None,
    };

    print!("{}", report::format_report(&cli.word, &results, definitions.as_ref()));
    Ok(())
}
