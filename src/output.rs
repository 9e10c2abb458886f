use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::pipeline::Outcome;

const TITLE: &str = "YouTube Transcript Summarizer: Extract Key Insights from YouTube Videos";
const SUMMARY_HEADER: &str = "Detailed Notes:";

/// Render an outcome for the terminal
pub fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::InvalidUrl { message } => message.clone(),
        Outcome::NoTranscript {
            thumbnail_url, message, ..
        }
        | Outcome::FetchError {
            thumbnail_url, message, ..
        }
        | Outcome::SummaryFailed {
            thumbnail_url, message, ..
        } => format!("Thumbnail: {thumbnail_url}\n{message}"),
        Outcome::Summarized {
            thumbnail_url, summary, ..
        } => format!("Thumbnail: {thumbnail_url}\n\n## {SUMMARY_HEADER}\n{summary}"),
    }
}

pub fn render_json(outcome: &Outcome) -> String {
    serde_json::to_string_pretty(outcome).unwrap_or_else(|e| format!(r#"{{"status":"error","message":"{e}"}}"#))
}

/// Full HTML page: the input form, then the result of `outcome` if there is one
pub fn render_page(url: &str, outcome: Option<&Outcome>) -> String {
    let mut body = String::new();

    if let Some(outcome) = outcome {
        if let Some(thumbnail) = outcome.thumbnail_url() {
            body.push_str(&format!(
                "<img class=\"thumbnail\" src=\"{}\" alt=\"Video thumbnail\">\n",
                encode_double_quoted_attribute(thumbnail)
            ));
        }
        match outcome {
            Outcome::Summarized { summary, .. } => {
                body.push_str(&format!(
                    "<h2>{SUMMARY_HEADER}</h2>\n<div class=\"summary\">{}</div>\n",
                    encode_text(summary)
                ));
            }
            Outcome::InvalidUrl { message }
            | Outcome::NoTranscript { message, .. }
            | Outcome::FetchError { message, .. }
            | Outcome::SummaryFailed { message, .. } => {
                body.push_str(&format!("<p class=\"message\">{}</p>\n", encode_text(message)));
            }
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
input[type=text] {{ width: 100%; padding: 0.5rem; box-sizing: border-box; }}
.thumbnail {{ width: 100%; margin: 1rem 0; }}
.summary {{ white-space: pre-wrap; }}
.message {{ color: #a33; }}
</style>
</head>
<body>
<h1>{TITLE}</h1>
<form method="get" action="/">
<label for="url">Enter YouTube Video Link:</label>
<input type="text" id="url" name="url" value="{}">
</form>
{body}</body>
</html>
"#,
        encode_double_quoted_attribute(url)
    )
}
