//! HTML result page.

use super::{display_crop, format_with_unit};
use croprec_core::PredictionResult;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Crop Recommendation Result</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; color: #1f2d1f; }
h1 { color: #2e7d32; }
.crop { font-size: 2rem; font-weight: bold; color: #339933; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
td { padding: 0.35rem 0.5rem; border-bottom: 1px solid #dde5dd; }
td:last-child { text-align: right; }
button { background: #2e7d32; color: #fff; border: 0; padding: 0.6rem 1.2rem; border-radius: 4px; cursor: pointer; }
</style>
</head>
<body>
"#;

/// Render the result page for a prediction.
///
/// The page embeds a form that posts the echoed inputs and the label to
/// `/download_report`.
pub fn render_result_page(result: &PredictionResult) -> String {
    let crop = escape_html(&display_crop(&result.crop));

    let mut html = String::from(PAGE_HEAD);
    html.push_str("<h1>Crop Recommendation</h1>\n");
    html.push_str(&format!(
        "<p>Recommended crop: <span class=\"crop\">{crop}</span></p>\n"
    ));
    html.push_str(&format!(
        "<p>{}% of the model's trees agree on this recommendation.</p>\n",
        result.confidence_percent
    ));

    html.push_str("<h2>Input Parameters</h2>\n<table>\n");
    for (field, value) in result.input.iter() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(field.label()),
            escape_html(&format_with_unit(field, value))
        ));
    }
    html.push_str("</table>\n");

    if result.votes.len() > 1 {
        html.push_str("<h2>Tree Votes</h2>\n<ul>\n");
        for share in &result.votes {
            html.push_str(&format!(
                "<li>{}: {}</li>\n",
                escape_html(&display_crop(&share.crop)),
                share.votes
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<form method=\"post\" action=\"/download_report\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"crop\" value=\"{}\">\n",
        escape_html(&result.crop)
    ));
    for (key, value) in result.input.to_form() {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
            escape_html(&key),
            escape_html(&value)
        ));
    }
    html.push_str("<button type=\"submit\">Download PDF report</button>\n</form>\n");
    html.push_str("<p><a href=\"/\">&larr; New prediction</a></p>\n</body>\n</html>\n");
    html
}

// =============================================================================
// TESTS
// =============================================================================
