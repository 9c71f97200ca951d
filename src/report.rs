use crate::model::{DefinitionSet, SourceResult};

/// Render a lookup as terminal text: one section per source, in the
/// order the sources were requested, then the local dictionary view.
pub fn format_report(
    word: &str,
    results: &[SourceResult],
    definitions: Option<&DefinitionSet>,
) -> String {
    let mut output = format!("# {word}\n\n");

    for result in results {
        output.push_str(&format_source(result));
    }

    if let Some(set) = definitions {
        output.push_str(&format_definitions(set));
    }

    output
}

fn format_source(result: &SourceResult) -> String {
    let mut section = format!("## {} ({:.2?})\n", result.source, result.elapsed);

    if !result.link.is_empty() {
        section.push_str(&format!("{}\n", result.link));
    }
    section.push('\n');

    if let Some(error) = &result.error {
        section.push_str(&format!("error: {error}\n\n"));
        return section;
    }

    if result.entries.is_empty() {
        section.push_str("no results\n\n");
        return section;
    }

    for entry in &result.entries {
        if entry.meta.is_empty() {
            section.push_str(&format!("- {}: {}\n", entry.arabic, entry.translation));
        } else {
            section.push_str(&format!(
                "- [{}] {}: {}\n",
                entry.meta, entry.arabic, entry.translation
            ));
        }
    }
    section.push('\n');
    section
}

fn format_definitions(set: &DefinitionSet) -> String {
    if set.entries.is_empty() {
        return String::new();
    }

    let mut section = String::from("## hans wehr definitions\n\n");
    for entry in &set.entries {
        section.push_str(&format!("### {}\n\n{}\n", entry.word, entry.definition));

        if let Some(count) = entry.quran_occurrences {
            section.push_str(&format!("\nAppears {count} times in the Quran.\n"));
        }
        if let Some(root) = entry.truncated_root_definition() {
            section.push_str(&format!("\nRoot:\n{root}\n"));
        }
        section.push('\n');
    }
    section
}
