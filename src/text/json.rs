#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON object found in text")]
    NoObject,

    #[error("unbalanced braces in embedded JSON")]
    Unbalanced,
}

/// Pull the first JSON object out of free text.
///
/// LLM replies wrap their payload in prose and Markdown code fences, so
/// this scans from the first `{` and returns the substring up to the
/// brace that closes it. The scan tracks string literals and backslash
/// escapes, so a `{` or `}` inside a quoted value cannot mis-terminate
/// the object. Already-clean JSON passes through unchanged.
///
/// This is a scanner, not a parser: the caller still runs the extracted
/// substring through serde to validate it.
pub fn extract_json(input: &str) -> Result<&str, ExtractError> {
    let start = input.find('{').ok_or(ExtractError::NoObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&input[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_code_fence() {
        let input = "prefix ```json\n{\"a\":{\"b\":1}}\n``` suffix";
        assert_eq!(extract_json(input), Ok(r#"{"a":{"b":1}}"#));
    }

    #[test]
    fn clean_json_passes_through() {
        let input = r#"{"translation":"book","examples":[]}"#;
        assert_eq!(extract_json(input), Ok(input));
    }

    #[test]
    fn idempotent_on_clean_json() {
        let input = r#"{"a":1}"#;
        let once = extract_json(input).unwrap();
        assert_eq!(extract_json(once), Ok(once));
    }

    #[test]
    fn no_object_is_an_error() {
        assert_eq!(extract_json("just prose, no payload"), Err(ExtractError::NoObject));
    }

    #[test]
    fn unterminated_object_is_an_error() {
        assert_eq!(extract_json(r#"{"a": {"b": 1}"#), Err(ExtractError::Unbalanced));
    }

    #[test]
    fn braces_inside_strings_do_not_terminate() {
        assert_eq!(extract_json(r#"{"a":"}"}"#), Ok(r#"{"a":"}"}"#));
        assert_eq!(
            extract_json(r#"noise {"a":"{{", "b":"}"} trailer"#),
            Ok(r#"{"a":"{{", "b":"}"}"#)
        );
    }

    #[test]
    fn escaped_quote_inside_string_handled() {
        let input = r#"{"a":"he said \"}\" loudly"}"#;
        assert_eq!(extract_json(input), Ok(input));
    }

    #[test]
    fn multibyte_text_around_object() {
        let input = "الكلمة هي {\"ترجمة\":\"livre\"} انتهى";
        assert_eq!(extract_json(input), Ok("{\"ترجمة\":\"livre\"}"));
    }
}
