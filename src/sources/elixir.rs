use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use scraper::{Html, Selector};
use tracing::debug;

use super::{Source, SourceError, http};
use crate::model::TranslationEntry;

const ELIXIR_URL: &str = "https://quest.ms.mff.cuni.cz/cgi-bin/elixir/index.fcgi?mode=home";

/// Scraper for the ElixirFM morphology resolver.
///
/// The resolver is a CGI form, not a word-addressable page, so the
/// origin link is always the resolver home and the word goes in a
/// multipart POST.
pub struct Elixir {
    http: Client,
    base_url: String,
}

impl Elixir {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: ELIXIR_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    fn resolve_form(word: &str) -> Form {
        Form::new()
            .text("text", word.to_string())
            .text("code", "Unicode")
            .text("submit", "Resolve")
            .text("mode", "resolve")
            .text(".cgifields", "code")
            .text(".cgifields", "fuzzy")
            .text(".cgifields", "quick")
    }
}

#[async_trait]
impl Source for Elixir {
    fn name(&self) -> &'static str {
        "elixir"
    }

    fn link(&self, _word: &str) -> String {
        self.base_url.clone()
    }

    async fn query(&self, word: &str) -> Result<Vec<TranslationEntry>, SourceError> {
        let response = self
            .http
            .post(&self.base_url)
            .multipart(Self::resolve_form(word))
            .send()
            .await?;
        let html = http::read_success_body(response).await?;
        debug!(bytes = html.len(), "elixir page fetched");
        parse_lexemes(&html)
    }
}

/// Each `.lexeme` node carries the grammatical tag, the vocalized
/// orthography and the English reflex.
fn parse_lexemes(html: &str) -> Result<Vec<TranslationEntry>, SourceError> {
    let lexeme = selector(".lexeme")?;
    let tag = selector(".xtag")?;
    let orth = selector(".orth")?;
    let reflex = selector(".reflex")?;

    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    for node in document.select(&lexeme) {
        let arabic = node_text(&node, &orth);
        // Reflex lists come quoted; the quotes are noise in a table cell.
        let translation = node_text(&node, &reflex).replace('"', "");
        let meta = node_text(&node, &tag);

        entries.push(TranslationEntry {
            arabic,
            translation,
            meta,
        });
    }

    Ok(entries)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(e.to_string()))
}

fn node_text(node: &scraper::ElementRef<'_>, inner: &Selector) -> String {
    node.select(inner)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
const SAMPLE: &str = r#"
        <html><body>
          <div class="lexeme">
            <span class="xtag">N</span>
            <span class="orth">كِتاب</span>
            <span class="reflex">"book" "volume"</span>
          </div>
          <div class="lexeme">
            <span class="xtag">V</span>
            <span class="orth">كَتَبَ</span>
            <span class="reflex">"to write"</span>
          </div>
        </body></html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lexeme_nodes() {
        let entries = parse_lexemes(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].arabic, "كِتاب");
        assert_eq!(entries[0].meta, "N");
        assert_eq!(entries[1].translation, "to write");
    }

    #[test]
    fn strips_quotes_from_reflex() {
        let entries = parse_lexemes(SAMPLE).unwrap();
        assert_eq!(entries[0].translation, "book volume");
    }

    #[test]
    fn page_without_lexemes_yields_no_entries() {
        let entries = parse_lexemes("<html><body><p>no match</p></body></html>").unwrap();
        assert!(entries.is_empty());
    }
}
