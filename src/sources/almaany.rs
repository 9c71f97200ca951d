use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::{Source, SourceError, http};
use crate::model::TranslationEntry;

const ALMAANY_BASE: &str = "https://www.almaany.com";

/// Scraper for almaany.com's Arabic-English dictionary pages.
pub struct Almaany {
    http: Client,
    base_url: String,
}

impl Almaany {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: ALMAANY_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    fn word_url(&self, word: &str) -> String {
        let encoded = utf8_percent_encode(word, NON_ALPHANUMERIC);
        format!("{}/en/dict/ar-en/{}/?c=Tout", self.base_url, encoded)
    }
}

#[async_trait]
impl Source for Almaany {
    fn name(&self) -> &'static str {
        "almaany"
    }

    fn link(&self, word: &str) -> String {
        self.word_url(word)
    }

    async fn query(&self, word: &str) -> Result<Vec<TranslationEntry>, SourceError> {
        let url = self.word_url(word);
        let response = self.http.get(&url).send().await?;
        let html = http::read_success_body(response).await?;
        debug!(%url, bytes = html.len(), "almaany page fetched");
        parse_results(&html)
    }
}

/// The translation table lives in the light-yellow panel, one `.row`
/// per pair: Arabic cell on the left, English on the right.
fn parse_results(html: &str) -> Result<Vec<TranslationEntry>, SourceError> {
    let rows = selector(".panel-lightyellow .row")?;
    let arabic_cell = selector(".text-left")?;
    let english_cell = selector(".text-right")?;

    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    for row in document.select(&rows) {
        let arabic = cell_text(&row, &arabic_cell);
        let translation = cell_text(&row, &english_cell);
        if arabic.is_empty() && translation.is_empty() {
            continue;
        }
        entries.push(TranslationEntry::new(arabic, translation));
    }

    Ok(entries)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(e.to_string()))
}

/// Collect a cell's text and strip the filler dots almaany pads cells with.
fn cell_text(row: &scraper::ElementRef<'_>, cell: &Selector) -> String {
    row.select(cell)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim_matches([' ', '.', '\n', '\t'].as_slice())
        .to_string()
}

#[cfg(test)]
const SAMPLE: &str = r#"
        <html><body>
          <div class="panel panel-lightyellow">
            <div class="row">
              <div class="text-left"> كِتاب .. </div>
              <div class="text-right"> book . </div>
            </div>
            <div class="row">
              <div class="text-left">كِتابُ مَدْرَسِيّ</div>
              <div class="text-right">school book</div>
            </div>
            <div class="row"></div>
          </div>
          <div class="panel panel-default">
            <div class="row"><div class="text-left">noise</div></div>
          </div>
        </body></html>"#;


#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn query_scrapes_served_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex("^/en/dict/ar-en/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let source = Almaany::with_base_url(Client::new(), &server.uri());
        let entries = source.query("كتاب").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].translation, "book");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let source = Almaany::with_base_url(Client::new(), &server.uri());
        let err = source.query("كتاب").await.unwrap_err();
        match err {
            SourceError::Status { status, snippet } => {
                assert_eq!(status, 503);
                assert!(snippet.contains("maintenance"));
            }
            other => panic!("expected status error, got: {other:?}"),
        }
    }
}
