use std::fmt::Write;

// The report micro-grammar: three heading depths, bullets, ordered items,
// horizontal rules, single-line paragraphs, and bold/italic inline spans.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Bullet(Vec<Span>),
    Ordered { number: u32, spans: Vec<Span> },
    Rule,
    Paragraph(Vec<Span>),
}

impl Block {
    #[allow(dead_code)] // Structure-inspection utility for renderers and tests
    pub fn plain_text(&self) -> String {
        let spans = match self {
            Block::Heading { spans, .. } => spans,
            Block::Bullet(spans) => spans,
            Block::Ordered { spans, .. } => spans,
            Block::Paragraph(spans) => spans,
            Block::Rule => return String::new(),
        };
        spans
            .iter()
            .map(|span| match span {
                Span::Text(text) | Span::Bold(text) | Span::Italic(text) => text.as_str(),
            })
            .collect()
    }
}

pub fn parse(text: &str) -> Vec<Block> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Block {
    if line == "---" {
        return Block::Rule;
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return Block::Heading {
            level: 3,
            spans: parse_spans(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading {
            level: 2,
            spans: parse_spans(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading {
            level: 1,
            spans: parse_spans(rest),
        };
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Block::Bullet(parse_spans(rest));
    }
    if let Some(dot) = line.find(". ") {
        let (digits, rest) = line.split_at(dot);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = digits.parse() {
                return Block::Ordered {
                    number,
                    spans: parse_spans(&rest[2..]),
                };
            }
        }
    }
    Block::Paragraph(parse_spans(line))
}

fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(star) = rest.find('*') else {
            spans.push(Span::Text(rest.to_string()));
            break;
        };
        if star > 0 {
            spans.push(Span::Text(rest[..star].to_string()));
        }
        rest = &rest[star..];

        if let Some(inner) = rest.strip_prefix("**") {
            match inner.find("**") {
                Some(end) => {
                    spans.push(Span::Bold(inner[..end].to_string()));
                    rest = &inner[end + 2..];
                }
                None => {
                    // Unterminated marker reads as literal text.
                    spans.push(Span::Text(rest.to_string()));
                    break;
                }
            }
        } else {
            let inner = &rest[1..];
            match inner.find('*') {
                Some(end) => {
                    spans.push(Span::Italic(inner[..end].to_string()));
                    rest = &inner[end + 1..];
                }
                None => {
                    spans.push(Span::Text(rest.to_string()));
                    break;
                }
            }
        }
    }

    spans
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_spans_html(spans: &[Span]) -> String {
    let mut html = String::new();
    for span in spans {
        match span {
            Span::Text(text) => html.push_str(&escape_html(text)),
            Span::Bold(text) => {
                let _ = write!(html, "<strong>{}</strong>", escape_html(text));
            }
            Span::Italic(text) => {
                let _ = write!(html, "<em>{}</em>", escape_html(text));
            }
        }
    }
    html
}

pub fn render_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut list_open: Option<&str> = None;

    for block in blocks {
        let list_tag = match block {
            Block::Bullet(_) => Some("ul"),
            Block::Ordered { .. } => Some("ol"),
            _ => None,
        };
        if list_open != list_tag {
            if let Some(tag) = list_open {
                let _ = writeln!(html, "</{tag}>");
            }
            if let Some(tag) = list_tag {
                let _ = writeln!(html, "<{tag}>");
            }
            list_open = list_tag;
        }

        match block {
            Block::Heading { level, spans } => {
                let _ = writeln!(html, "<h{level}>{}</h{level}>", render_spans_html(spans));
            }
            Block::Bullet(spans) | Block::Ordered { spans, .. } => {
                let _ = writeln!(html, "<li>{}</li>", render_spans_html(spans));
            }
            Block::Rule => {
                let _ = writeln!(html, "<hr>");
            }
            Block::Paragraph(spans) => {
                let _ = writeln!(html, "<p>{}</p>", render_spans_html(spans));
            }
        }
    }
    if let Some(tag) = list_open {
        let _ = writeln!(html, "</{tag}>");
    }

    html
}

pub fn render_document(title: &str, blocks: &[Block]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title} - Diagnostic Report</title>
<style>
body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  font-size: 14px;
  line-height: 1.6;
  color: #333;
  max-width: 800px;
  margin: 0 auto;
  padding: 40px;
  background: #fff;
}}
h1 {{ font-size: 24px; font-weight: 600; margin-bottom: 16px; color: #1a1a1a; }}
h2 {{ font-size: 20px; font-weight: 600; margin-top: 24px; margin-bottom: 12px; color: #1a1a1a; }}
h3 {{ font-size: 16px; font-weight: 600; margin-top: 20px; margin-bottom: 8px; color: #1a1a1a; }}
p {{ margin-bottom: 12px; }}
em {{ color: #666; }}
ul, ol {{ margin-bottom: 12px; padding-left: 20px; }}
li {{ margin-bottom: 4px; }}
hr {{ border: none; border-top: 1px solid #e5e5e5; margin: 24px 0; }}
@media print {{ body {{ padding: 20px; }} }}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(title),
        body = render_html(blocks),
    )
}
