//! Agent reply reshaping
//!
//! Agent replies sometimes arrive as a JSON-encoded envelope carrying an HTML
//! fragment (`{ message, data: [{ value: { promptResponse } }] }`). The UI
//! renders the HTML as-is; the TTS pipeline needs a plain-text variant with
//! tags and entities resolved. Plain replies pass through untouched.

/// A reply split into UI and speech variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedReply {
    /// HTML-safe text for the UI
    pub text_for_ui: String,
    /// Tag-free text for speech synthesis
    pub text_for_speech: String,
    /// Whether the UI variant contains HTML markup
    pub has_html: bool,
}

/// Structured envelope shape emitted by prompt-template agents
#[derive(serde::Deserialize)]
struct StructuredReply {
    message: String,
    #[serde(default)]
    data: Vec<StructuredItem>,
}

#[derive(serde::Deserialize)]
struct StructuredItem {
    value: StructuredValue,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredValue {
    #[serde(default)]
    prompt_response: String,
}

/// Split a raw agent reply into UI and speech variants
///
/// A reply matching the structured envelope gets its message and HTML blocks
/// concatenated for the UI and stripped for speech; anything else is used
/// verbatim for both.
#[must_use]
pub fn process_reply(raw: &str) -> ProcessedReply {
    if let Ok(structured) = serde_json::from_str::<StructuredReply>(raw) {
        let mut ui = structured.message.trim().to_string();
        let mut has_html = false;

        for item in &structured.data {
            let block = item.value.prompt_response.trim();
            if block.is_empty() {
                continue;
            }
            has_html = true;
            if !ui.is_empty() {
                ui.push_str("\n\n");
            }
            ui.push_str(block);
        }

        let speech = strip_html(&ui);
        return ProcessedReply {
            text_for_ui: ui,
            text_for_speech: speech,
            has_html,
        };
    }

    ProcessedReply {
        text_for_ui: raw.to_string(),
        text_for_speech: raw.to_string(),
        has_html: false,
    }
}

/// Strip HTML markup, producing TTS-safe plain text
///
/// Line breaks, paragraph and list markup become newlines and bullets; every
/// other tag is removed; entities are decoded. Already-plain text comes back
/// unchanged.
#[must_use]
pub fn strip_html(input: &str) -> String {
    let stripped = strip_tags(input);
    let decoded = decode_entities(&stripped);
    collapse_newlines(decoded.trim())
}

/// Replace tags with their plain-text equivalents
fn strip_tags(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut remaining = input;

    while let Some(start) = remaining.find('<') {
        output.push_str(&remaining[..start]);
        let after = &remaining[start + 1..];

        // Only treat this as a tag when it plausibly is one
        let looks_like_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');

        if !looks_like_tag {
            output.push('<');
            remaining = after;
            continue;
        }

        let Some(end) = after.find('>') else {
            // Unterminated, keep the rest literally
            output.push('<');
            output.push_str(after);
            return output;
        };

        output.push_str(tag_replacement(&after[..end]));
        remaining = &after[end + 1..];
    }

    output.push_str(remaining);
    output
}

/// Plain-text stand-in for a single tag body (content between `<` and `>`)
fn tag_replacement(tag: &str) -> &'static str {
    let body = tag.trim();
    let closing = body.starts_with('/');
    let name: String = body
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();

    match (name.as_str(), closing) {
        ("br", _) => "\n",
        ("p", true) => "\n\n",
        ("ul" | "ol" | "div" | "tr", true) => "\n",
        ("li", false) => "\n- ",
        // Closing </li> and every unrecognized tag vanish
        _ => "",
    }
}

/// Decode the HTML entities the agent vendor is known to emit
///
/// `&amp;` is decoded last so entity-encoded entities resolve exactly once.
fn decode_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Collapse runs of three or more newlines down to a blank line
fn collapse_newlines(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut run = 0;

    for ch in input.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 2 {
                output.push(ch);
            }
        } else {
            run = 0;
            output.push(ch);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_reply_passes_through() {
        let processed = process_reply("Just a normal answer.");
        assert_eq!(processed.text_for_ui, "Just a normal answer.");
        assert_eq!(processed.text_for_speech, "Just a normal answer.");
        assert!(!processed.has_html);
    }

    #[test]
    fn structured_reply_splits_ui_and_speech() {
        let raw = r#"{
            "message": "Here are your results:",
            "data": [{"value": {"promptResponse": "<p>First item</p><ul><li>alpha</li><li>beta</li></ul>"}}]
        }"#;

        let processed = process_reply(raw);
        assert!(processed.has_html);
        assert!(processed.text_for_ui.starts_with("Here are your results:"));
        assert!(processed.text_for_ui.contains("<ul>"));
        assert!(!processed.text_for_speech.contains('<'));
        assert!(processed.text_for_speech.contains("- alpha"));
        assert!(processed.text_for_speech.contains("- beta"));
    }

    #[test]
    fn structured_reply_without_html_blocks() {
        let raw = r#"{"message": "No extra data.", "data": []}"#;

        let processed = process_reply(raw);
        assert!(!processed.has_html);
        assert_eq!(processed.text_for_ui, "No extra data.");
        assert_eq!(processed.text_for_speech, "No extra data.");
    }

    #[test]
    fn non_matching_json_is_treated_as_plain() {
        let raw = r#"{"something": "else"}"#;

        let processed = process_reply(raw);
        assert!(!processed.has_html);
        assert_eq!(processed.text_for_ui, raw);
    }

    #[test]
    fn strip_removes_tags_and_entities() {
        assert_eq!(
            strip_html("<p>Tom &amp; Jerry</p>"),
            "Tom & Jerry"
        );
        assert_eq!(strip_html("a<br>b<br/>c"), "a\nb\nc");
        assert_eq!(
            strip_html("<ul><li>one</li><li>two</li></ul>"),
            "- one\n- two"
        );
        assert_eq!(strip_html("&lt;b&gt; is a tag"), "<b> is a tag");
        assert_eq!(strip_html("3&nbsp;&#39;clock"), "3 'clock");
    }

    #[test]
    fn strip_is_idempotent_on_plain_text() {
        let plain = "Hello, world. 1 + 2 = 3";
        assert_eq!(strip_html(plain), plain);
        assert_eq!(strip_html(&strip_html(plain)), strip_html(plain));
    }

    #[test]
    fn strip_is_idempotent_on_stripped_output() {
        let html = "<p>First</p><p>Second &amp; third</p>";
        let once = strip_html(html);
        assert_eq!(strip_html(&once), once);
    }

    #[test]
    fn strip_keeps_literal_angle_brackets() {
        assert_eq!(strip_html("x < y and y > z"), "x < y and y > z");
    }

    #[test]
    fn strip_collapses_newline_runs() {
        assert_eq!(
            strip_html("<p>a</p><p></p><p>b</p>"),
            "a\n\nb"
        );
    }
}
