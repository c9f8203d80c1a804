//! Thought rendering: markdown with citation markers resolved against
//! related documents.

use crate::theme::Theme;
use crate::widgets::truncate_to_width;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;
use std::sync::LazyLock;
use toolrun_core::RelatedDocument;
use unicode_width::UnicodeWidthStr;

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^(\d+)\]").expect("citation pattern is valid"));

/// Rewrite `[^N]` markers to `[N]` and collect the cited documents.
///
/// Documents are matched by rank and returned in order of first citation.
/// Markers citing an unknown rank are still rewritten.
pub fn cite_sources<'d>(
    text: &str,
    documents: &'d [RelatedDocument],
) -> (String, Vec<&'d RelatedDocument>) {
    let mut cited: Vec<&RelatedDocument> = Vec::new();
    for caps in CITATION.captures_iter(text) {
        let Ok(rank) = caps[1].parse::<u32>() else {
            continue;
        };
        if let Some(doc) = documents.iter().find(|d| d.rank == rank) {
            if !cited.iter().any(|c| c.rank == rank) {
                cited.push(doc);
            }
        }
    }
    let rewritten = CITATION.replace_all(text, "[$1]").into_owned();
    (rewritten, cited)
}

/// Render a thought to styled lines
pub fn render_thought(
    text: &str,
    documents: &[RelatedDocument],
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let (text, cited) = cite_sources(text, documents);
    let mut lines = render_markdown(&text, theme, width);

    if !cited.is_empty() {
        lines.push(Line::from(Span::styled("Sources:", theme.dim_style())));
        for doc in cited {
            let marker = format!("  [{}] ", doc.rank);
            let link_width = width.saturating_sub(marker.chars().count());
            lines.push(Line::from(vec![
                Span::styled(marker, theme.dim_style()),
                Span::styled(
                    truncate_to_width(&doc.source_link, link_width),
                    theme.link_style(),
                ),
            ]));
        }
    }

    lines
}

fn render_markdown(text: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![theme.base_style()];
    let mut in_code_block = false;
    let mut code_block_content = String::new();
    let mut list_depth: usize = 0;

    for event in Parser::new(text) {
        let current_style = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph | Tag::Heading { .. } => {
                    flush(&mut lines, &mut current_line, width);
                }
                Tag::CodeBlock(_) => {
                    in_code_block = true;
                    code_block_content.clear();
                    flush(&mut lines, &mut current_line, width);
                }
                Tag::List(_) => list_depth += 1,
                Tag::Item => {
                    flush(&mut lines, &mut current_line, width);
                    let indent = "  ".repeat(list_depth.saturating_sub(1));
                    current_line.push(Span::styled(format!("{}• ", indent), theme.dim_style()));
                }
                Tag::Emphasis => styles.push(current_style.add_modifier(Modifier::ITALIC)),
                Tag::Strong => styles.push(current_style.add_modifier(Modifier::BOLD)),
                Tag::Link { .. } => styles.push(current_style.patch(theme.link_style())),
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item => {
                    flush(&mut lines, &mut current_line, width);
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    let code_style = theme.code_style().add_modifier(Modifier::DIM);
                    for code_line in code_block_content.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", truncate_to_width(code_line, width.saturating_sub(2))),
                            code_style,
                        )));
                    }
                }
                TagEnd::List(_) => list_depth = list_depth.saturating_sub(1),
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link => {
                    if styles.len() > 1 {
                        styles.pop();
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    code_block_content.push_str(&text);
                } else {
                    current_line.push(Span::styled(text.into_string(), current_style));
                }
            }
            Event::Code(code) => {
                let code_style = theme.code_style().add_modifier(Modifier::BOLD);
                current_line.push(Span::styled(format!("`{}`", code), code_style));
            }
            Event::SoftBreak => current_line.push(Span::styled(" ", current_style)),
            Event::HardBreak => flush(&mut lines, &mut current_line, width),
            _ => {}
        }
    }
    flush(&mut lines, &mut current_line, width);

    lines
}

fn flush(lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>, width: usize) {
    if !current.is_empty() {
        lines.extend(wrap_spans(std::mem::take(current), width));
    }
}

/// Greedy word wrap over styled spans. Words wider than `width` are split.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut line_width = 0;

    for span in spans {
        let style = span.style;
        for piece in span.content.split_inclusive(' ') {
            let word = piece.trim_end_matches(' ');
            let spaces = &piece[word.len()..];
            let word_width = word.width();

            if line_width > 0 && line_width + word_width > width {
                finish_line(&mut lines, &mut line);
                line_width = 0;
            }
            // Whitespace at a break point is dropped
            if line_width == 0 && word.is_empty() && !lines.is_empty() {
                continue;
            }

            if word_width > width {
                let mut chunks: Vec<String> =
                    textwrap::wrap(word, textwrap::Options::new(width).break_words(true))
                        .into_iter()
                        .map(|c| c.into_owned())
                        .collect();
                let tail = chunks.pop().unwrap_or_default();
                for chunk in chunks {
                    line.push(Span::styled(chunk, style));
                    finish_line(&mut lines, &mut line);
                }
                line_width = tail.width() + spaces.len();
                line.push(Span::styled(format!("{}{}", tail, spaces), style));
                continue;
            }

            line.push(Span::styled(piece.to_string(), style));
            line_width += piece.width();
        }
    }
    finish_line(&mut lines, &mut line);

    lines
}

fn finish_line(lines: &mut Vec<Line<'static>>, line: &mut Vec<Span<'static>>) {
    while line.last().is_some_and(|s| s.content.trim().is_empty()) {
        line.pop();
    }
    if let Some(last) = line.last_mut() {
        let trimmed = last.content.trim_end().to_string();
        last.content = trimmed.into();
    }
    if !line.is_empty() {
        lines.push(Line::from(std::mem::take(line)));
    }
}
