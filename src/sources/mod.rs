pub mod almaany;
pub mod elixir;
pub mod hanswehr;
mod http;
pub mod perplexity;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::model::TranslationEntry;
use crate::text::json::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status code error: {status}\n{snippet}")]
    Status { status: u16, snippet: String },

    #[error("failed to parse upstream response: {0}")]
    Parse(String),

    #[error("dictionary query failed: {0}")]
    Dictionary(#[from] rusqlite::Error),

    #[error("dictionary worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("PERPLEXITY_API_KEY not set")]
    ApiKeyNotSet,
}

/// The uniform capability every backend satisfies so the scheduler can
/// treat scrapers, the local database and the LLM alike.
///
/// Adapters must never panic on malformed upstream output, and must hold
/// no per-query mutable state: one instance serves concurrent lookups.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable display name for result slots and logs.
    fn name(&self) -> &'static str;

    /// Where a reader can see the answer in its original habitat.
    fn link(&self, word: &str) -> String;

    async fn query(&self, word: &str) -> Result<Vec<TranslationEntry>, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Almaany,
    Elixir,
    HansWehr,
    Perplexity,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::Almaany,
        SourceId::Elixir,
        SourceId::HansWehr,
        SourceId::Perplexity,
    ];
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceId::Almaany => "almaany",
            SourceId::Elixir => "elixir",
            SourceId::HansWehr => "hanswehr",
            SourceId::Perplexity => "perplexity",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "almaany" => Ok(SourceId::Almaany),
            "elixir" => Ok(SourceId::Elixir),
            "hanswehr" => Ok(SourceId::HansWehr),
            "perplexity" => Ok(SourceId::Perplexity),
            other => Err(format!(
                "unknown source '{other}' (expected almaany, elixir, hanswehr or perplexity)"
            )),
        }
    }
}

/// Identifier-to-adapter map, built once from configuration.
///
/// Dispatch goes through the registry instead of re-matching name
/// strings per request; a source missing from the registry (e.g. the
/// dictionary when no database path was given) is skipped with a
/// warning, leaving the other sources untouched.
#[derive(Default)]
pub struct Registry {
    sources: Vec<(SourceId, Arc<dyn Source>)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: SourceId, source: Arc<dyn Source>) {
        self.sources.push((id, source));
    }

    pub fn get(&self, id: SourceId) -> Option<Arc<dyn Source>> {
        self.sources
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| Arc::clone(s))
    }

    /// Resolve the requested ids in order, dropping unregistered ones.
    pub fn select(&self, ids: &[SourceId]) -> Vec<Arc<dyn Source>> {
        ids.iter()
            .filter_map(|id| {
                let found = self.get(*id);
                if found.is_none() {
                    warn!(source = %id, "requested source is not configured, skipping");
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(&'static str);

    #[async_trait]
    impl Source for Dummy {
        fn name(&self) -> &'static str {
            self.0
        }

        fn link(&self, _word: &str) -> String {
            String::new()
        }

        async fn query(&self, _word: &str) -> Result<Vec<TranslationEntry>, SourceError> {
            Ok(vec![])
        }
    }

    #[test]
    fn source_id_round_trips_through_strings() {
        for id in SourceId::ALL {
            assert_eq!(id.to_string().parse::<SourceId>(), Ok(id));
        }
    }

    #[test]
    fn source_id_parse_is_case_insensitive() {
        assert_eq!("Almaany".parse::<SourceId>(), Ok(SourceId::Almaany));
        assert_eq!(" HANSWEHR ".parse::<SourceId>(), Ok(SourceId::HansWehr));
    }

    #[test]
    fn unknown_source_id_is_an_error() {
        assert!("wiktionary".parse::<SourceId>().is_err());
    }

    #[test]
    fn select_preserves_requested_order() {
        let mut registry = Registry::new();
        registry.register(SourceId::Almaany, Arc::new(Dummy("almaany")));
        registry.register(SourceId::Elixir, Arc::new(Dummy("elixir")));

        let picked = registry.select(&[SourceId::Elixir, SourceId::Almaany]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name(), "elixir");
        assert_eq!(picked[1].name(), "almaany");
    }

    #[test]
    fn select_skips_unregistered_sources() {
        let mut registry = Registry::new();
        registry.register(SourceId::Almaany, Arc::new(Dummy("almaany")));

        let picked = registry.select(&[SourceId::HansWehr, SourceId::Almaany]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name(), "almaany");
    }
}
