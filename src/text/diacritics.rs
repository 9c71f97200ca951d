use unicode_normalization::char::is_combining_mark;

/// Strip Arabic vowel marks (harakat) and trim surrounding whitespace.
///
/// The Hans Wehr database indexes words without diacritics, so queries
/// must be normalized the same way. Removal is by Unicode category
/// (nonspacing mark), which covers fatha/damma/kasra, their tanwin
/// forms, shadda, sukun and the dagger alif; base letters and their
/// order are untouched.
pub fn strip_diacritics(input: &str) -> String {
    input
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}
