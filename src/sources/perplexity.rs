use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Source, SourceError, http};
use crate::model::TranslationEntry;
use crate::text::json::extract_json;

const API_BASE: &str = "https://api.perplexity.ai";
const DEFAULT_MODEL: &str = "sonar-pro";

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// LLM backend: asks Perplexity for a translation plus example
/// sentences, as a JSON payload embedded in the chat reply.
///
/// One attempt per lookup; transient upstream trouble surfaces as this
/// source's error slot rather than a retry.
pub struct Perplexity {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    target_lang: String,
    example_count: u8,
}

impl Perplexity {
    pub fn from_env(http: Client, target_lang: &str, example_count: u8) -> Result<Self, SourceError> {
        let api_key = env::var("PERPLEXITY_API_KEY").map_err(|_| SourceError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(SourceError::ApiKeyNotSet);
        }
        let model = env::var("PERPLEXITY_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model,
            base_url: API_BASE.to_string(),
            target_lang: target_lang.to_string(),
            example_count,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
            target_lang: "french".to_string(),
            example_count: 5,
        }
    }

    fn prompt(&self, word: &str) -> String {
        format!(
            r#"Give me {count} examples of useful and relevant sentences from medias or stories with the proper arabic diacritics (harakats) on all words.

The word is: {word}

The translation language should be {lang}

The output should be in JSON format like so:

{{
    "translation": "The translation of the word",
    "examples": [
         {{"sentence": "An example of sentence", "translation": "The translation of the setence in the target language"}},
     ]
}}
"#,
            count = self.example_count,
            lang = self.target_lang,
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: String,
    temperature: f32,
    top_p: f32,
    search_domain_filter: Vec<String>,
    return_images: bool,
    return_related_questions: bool,
    search_recency_filter: String,
    top_k: u32,
    stream: bool,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// The fixed shape the prompt asks the model to fill in.
#[derive(Debug, Deserialize)]
struct PromptReply {
    translation: String,
    #[serde(default)]
    examples: Vec<PromptExample>,
}

#[derive(Debug, Deserialize)]
struct PromptExample {
    sentence: String,
    translation: String,
}

#[async_trait]
impl Source for Perplexity {
    fn name(&self) -> &'static str {
        "perplexity"
    }

    fn link(&self, _word: &str) -> String {
        // Chat completions have no stable page to point at.
        String::new()
    }

    async fn query(&self, word: &str) -> Result<Vec<TranslationEntry>, SourceError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "Don't repeat yourself, be precise and concise.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: self.prompt(word),
                },
            ],
            max_tokens: "1000".to_string(),
            temperature: 0.2,
            top_p: 0.9,
            search_domain_filter: vec!["perplexity.ai".to_string()],
            return_images: false,
            return_related_questions: false,
            search_recency_filter: "month".to_string(),
            top_k: 0,
            stream: false,
            presence_penalty: 0.0,
            frequency_penalty: 1.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.0))
            .json(&request)
            .send()
            .await?;
        let body = http::read_success_body(response).await?;

        let reply: ChatResponse = serde_json::from_str(&body)?;
        let content = match reply.choices.first() {
            Some(choice) => &choice.message.content,
            None => return Err(SourceError::Parse("empty choices in chat response".to_string())),
        };
        debug!(model = %self.model, chars = content.len(), "perplexity replied");

        // The model wraps its JSON in prose or code fences; unwrap first,
        // then let serde validate the payload.
        let payload: PromptReply = serde_json::from_str(extract_json(content)?)?;

        let mut entries = vec![TranslationEntry::new(word, payload.translation)];
        entries.extend(
            payload
                .examples
                .into_iter()
                .map(|ex| TranslationEntry::new(ex.sentence, ex.translation)),
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn query_unwraps_fenced_json_reply() {
        let server = MockServer::start().await;
        let content = "Here you go:\n```json\n{\"translation\":\"livre\",\"examples\":[{\"sentence\":\"قرأتُ كِتاباً\",\"translation\":\"J'ai lu un livre\"}]}\n```";
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(content)))
            .mount(&server)
            .await;

        let source = Perplexity::with_base_url(Client::new(), &server.uri());
        let entries = source.query("كتاب").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].arabic, "كتاب");
        assert_eq!(entries[0].translation, "livre");
        assert_eq!(entries[1].arabic, "قرأتُ كِتاباً");
    }

    #[tokio::test]
    async fn query_sends_prompt_with_word() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("The word is: قلم"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
                "{\"translation\":\"stylo\",\"examples\":[]}",
            )))
            .mount(&server)
            .await;

        let source = Perplexity::with_base_url(Client::new(), &server.uri());
        let entries = source.query("قلم").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].translation, "stylo");
    }

    #[tokio::test]
    async fn empty_choices_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let source = Perplexity::with_base_url(Client::new(), &server.uri());
        let err = source.query("كتاب").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn reply_without_json_object_is_an_extract_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_reply("I cannot answer that.")),
            )
            .mount(&server)
            .await;

        let source = Perplexity::with_base_url(Client::new(), &server.uri());
        let err = source.query("كتاب").await.unwrap_err();
        assert!(matches!(err, SourceError::Extract(_)));
    }

    #[tokio::test]
    async fn rate_limit_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let source = Perplexity::with_base_url(Client::new(), &server.uri());
        let err = source.query("كتاب").await.unwrap_err();
        match err {
            SourceError::Status { status, .. } => assert_eq!(status, 429),
            other => panic!("expected status error, got: {other:?}"),
        }
    }
}
