use reqwest::Response;

use super::SourceError;

const MAX_SNIPPET_BYTES: usize = 256;

/// Read the body of a 2xx response; anything else becomes a status
/// error carrying a short snippet of whatever the server sent back.
pub(super) async fn read_success_body(response: Response) -> Result<String, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            snippet: truncate(&text, MAX_SNIPPET_BYTES).to_string(),
        });
    }
    Ok(response.text().await?)
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_is_identity() {
        assert_eq!(truncate("short", 256), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "ك".repeat(300);
        let cut = truncate(&text, 255);
        assert!(cut.len() <= 255);
        assert!(cut.chars().all(|c| c == 'ك'));
    }
}
