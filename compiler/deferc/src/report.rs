//! Source reports for parse failures.

use ariadne::{Config, Label, Report, ReportKind, Source};
use defer_parse::ParseError;
use std::ops::Range;

/// Render `error` against the text it came from.
pub fn render_parse_error(source_text: &str, error: &ParseError) -> String {
    let span = label_span(source_text, error);
    let mut out = Vec::new();
    let written = Report::<Range<usize>>::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(false))
        .with_message("cannot parse expression")
        .with_label(Label::new(span).with_message(error.to_string()))
        .finish()
        .write(Source::from(source_text), &mut out);
    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: cannot parse `{source_text}`: {error}"),
    }
}

/// The error's span, or the last character when the error is at the end.
fn label_span(source_text: &str, error: &ParseError) -> Range<usize> {
    if let Some(span) = error.span() {
        return span.to_range();
    }
    let end = source_text.len();
    let start = source_text
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i);
    start..end
}
