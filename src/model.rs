use std::time::Duration;

/// One aligned pair from any backend: an Arabic form and its rendering
/// in the target language, with an optional grammatical tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub arabic: String,
    pub translation: String,
    pub meta: String,
}

impl TranslationEntry {
    pub fn new(arabic: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            arabic: arabic.into(),
            translation: translation.into(),
            meta: String::new(),
        }
    }
}

/// The outcome of one source for one lookup. Exactly one of these exists
/// per enabled source, whether the source succeeded or not; `error` being
/// `None` is what distinguishes success.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub source: String,
    pub entries: Vec<TranslationEntry>,
    pub link: String,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl SourceResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-source results in the same order the sources were requested.
pub type AggregatedResult = Vec<SourceResult>;

/// A Hans Wehr entry joined with its root (parent) entry.
///
/// The root fields are `None` either when the database has no parent row
/// or when the entry is its own root — a word should not cross-reference
/// itself.
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    pub id: i64,
    pub word: String,
    pub definition: String,
    pub root: Option<String>,
    pub root_definition: Option<String>,
    pub quran_occurrences: Option<i64>,
}

impl DictionaryEntry {
    /// Root cross-reference for display, bounded in length so a long root
    /// article does not swamp the entry it annotates.
    pub fn truncated_root_definition(&self) -> Option<String> {
        let root = self.root.as_deref()?;
        let def = self.root_definition.as_deref().unwrap_or_default();
        Some(truncate_chars(&format!("{root}\n---\n{def}"), 128))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    pub entries: Vec<DictionaryEntry>,
}

/// Truncate to at most `max` characters, never splitting a code point.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, def: &str, root: Option<&str>, root_def: Option<&str>) -> DictionaryEntry {
        DictionaryEntry {
            id: 1,
            word: word.into(),
            definition: def.into(),
            root: root.map(Into::into),
            root_definition: root_def.map(Into::into),
            quran_occurrences: None,
        }
    }

    #[test]
    fn truncated_root_definition_absent_without_root() {
        let e = entry("كتاب", "book", None, None);
        assert_eq!(e.truncated_root_definition(), None);
    }

    #[test]
    fn truncated_root_definition_combines_root_and_text() {
        let e = entry("كتاب", "book", Some("كتب"), Some("to write"));
        let text = e.truncated_root_definition().unwrap();
        assert!(text.starts_with("كتب\n---\n"));
        assert!(text.contains("to write"));
    }

    #[test]
    fn truncated_root_definition_bounds_length_on_char_boundary() {
        let long = "مدرسة ".repeat(100);
        let e = entry("مدرسة", "school", Some("درس"), Some(&long));
        let text = e.truncated_root_definition().unwrap();
        assert_eq!(text.chars().count(), 128);
    }

    #[test]
    fn truncate_chars_is_noop_on_short_input() {
        assert_eq!(truncate_chars("short", 128), "short");
    }
}
