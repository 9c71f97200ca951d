use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, params};
use tracing::debug;

use super::{Source, SourceError};
use crate::model::{DefinitionSet, DictionaryEntry, TranslationEntry};
use crate::text::diacritics::strip_diacritics;
use crate::text::verb_forms::VerbForms;

/// Exact-match lookup joined with the root (parent) article, bounded so
/// a productive root cannot flood the page.
const LOOKUP_SQL: &str = "
SELECT
    d1.id, d1.word, d1.definition, d2.word, d2.definition, d1.quran_occurrence
FROM
    DICTIONARY d1
    INNER JOIN
    DICTIONARY d2
    ON d2.id = d1.parent_id
    WHERE d1.word = ?1
    LIMIT 10
";

/// Local Hans Wehr dictionary stored in SQLite.
///
/// The database indexes words without harakat, so queries are stripped
/// before matching. The connection sees read-only traffic and is shared
/// across concurrent lookups behind a mutex; the actual rusqlite work
/// runs on the blocking pool.
pub struct HansWehr {
    conn: Arc<Mutex<Connection>>,
    forms: Arc<VerbForms>,
}

impl HansWehr {
    pub fn open(path: &Path, forms: VerbForms) -> Result<Self, SourceError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self::with_connection(conn, forms))
    }

    fn with_connection(conn: Connection, forms: VerbForms) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            forms: Arc::new(forms),
        }
    }

    /// Full dictionary view for the presentation layer, richer than the
    /// aligned pairs this source contributes to the aggregate.
    pub async fn definitions(&self, word: &str) -> Result<DefinitionSet, SourceError> {
        let conn = Arc::clone(&self.conn);
        let forms = Arc::clone(&self.forms);
        let normalized = strip_diacritics(word);

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            lookup(&conn, &forms, &normalized)
        })
        .await?
    }
}

fn lookup(conn: &Connection, forms: &VerbForms, word: &str) -> Result<DefinitionSet, SourceError> {
    let mut stmt = conn.prepare(LOOKUP_SQL)?;
    let rows = stmt.query_map(params![word], |row| {
        Ok(DictionaryEntry {
            id: row.get(0)?,
            word: row.get(1)?,
            definition: row.get(2)?,
            root: row.get(3)?,
            root_definition: row.get(4)?,
            quran_occurrences: row.get(5)?,
        })
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let mut entry = row?;

        // Inline verb-form markers become readable annotations.
        entry.definition = forms.patch(&entry.definition);
        entry.root_definition = entry.root_definition.as_deref().map(|d| forms.patch(d));

        // A word that is its own root gets no cross-reference.
        if entry.root_definition.as_deref() == Some(entry.definition.as_str()) {
            entry.root = None;
            entry.root_definition = None;
        }

        entries.push(entry);
    }

    debug!(word, count = entries.len(), "hans wehr lookup");
    Ok(DefinitionSet { entries })
}

#[async_trait]
impl Source for HansWehr {
    fn name(&self) -> &'static str {
        "hanswehr"
    }

    fn link(&self, _word: &str) -> String {
        // Local database, nothing to point a browser at.
        String::new()
    }

    async fn query(&self, word: &str) -> Result<Vec<TranslationEntry>, SourceError> {
        let set = self.definitions(word).await?;
        Ok(set
            .entries
            .into_iter()
            .map(|entry| TranslationEntry {
                arabic: entry.word,
                translation: entry.definition,
                meta: entry.root.unwrap_or_default(),
            })
            .collect())
    }
}
