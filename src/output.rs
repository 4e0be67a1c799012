use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::handler::DisplayModel;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
input[type=url]{width:70%}\
.error{color:#a00;border:1px solid #a00;padding:.5rem}\
.summary{white-space:pre-wrap;border:1px solid #ccc;padding:.5rem}";

/// Render the index page for a display model
pub fn render_page(model: &DisplayModel) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<form method=\"post\" action=\"/summarize\">\n\
         <input type=\"url\" name=\"video_url\" placeholder=\"https://www.youtube.com/watch?v=...\" value=\"{}\">\n\
         <button type=\"submit\">Summarize</button>\n\
         </form>\n",
        encode_double_quoted_attribute(&model.input_url)
    ));

    if let Some(ref error) = model.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", encode_text(error)));
    }

    if let Some(ref summary) = model.summary {
        body.push_str(&format!(
            "<h2>Summary</h2>\n<div class=\"summary\">{}</div>\n",
            encode_text(summary)
        ));
    }

    if let Some(ref transcript) = model.raw_transcript {
        body.push_str(&format!(
            "<details>\n<summary>Full transcript</summary>\n<div class=\"summary\">{}</div>\n</details>\n",
            encode_text(transcript)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>YouTube Video Summarizer</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>YouTube Video Summarizer</h1>\n{body}</body>\n</html>\n"
    )
}
