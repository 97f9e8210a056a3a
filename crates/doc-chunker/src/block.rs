//! Line-oriented parser for headed markup documents.
//!
//! Produces typed blocks in document order. The parser is a plain iterator
//! over borrowed lines, so it is lazy, finite, and restartable by cloning.

use std::fmt;
use std::iter::Peekable;
use std::str::Lines;

const FENCE: &str = "```";

/// A structural unit of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`-prefixed heading, level = number of `#`
    Heading { level: usize, text: String },
    /// Run of plain non-blank lines
    Paragraph(String),
    /// Triple-backtick fenced code. `closed` is false when the fence runs
    /// to end of input.
    CodeBlock {
        info: String,
        body: String,
        closed: bool,
    },
    /// Contiguous `|`-prefixed rows
    Table(Vec<String>),
    /// List items with their continuation lines
    List(String),
    /// Thematic breaks, block quotes
    Other(String),
}

/// Why a block could not be rendered structurally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBlock(pub &'static str);

impl fmt::Display for MalformedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Block {
    /// Heading level and text, if this is a heading
    #[must_use]
    pub fn as_heading(&self) -> Option<(usize, &str)> {
        match self {
            Self::Heading { level, text } => Some((*level, text.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_paragraph(&self) -> bool {
        matches!(self, Self::Paragraph(_))
    }

    /// Short type label for diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph(_) => "paragraph",
            Self::CodeBlock { .. } => "code_block",
            Self::Table(_) => "table",
            Self::List(_) => "list",
            Self::Other(_) => "other",
        }
    }

    /// Render back to markup. Malformed blocks degrade to their raw text.
    #[must_use]
    pub fn render(&self) -> String {
        match self.render_structured() {
            Ok(text) => text,
            Err(reason) => {
                log::debug!("Rendering {} block as raw text: {reason}", self.kind());
                self.raw_text()
            }
        }
    }

    /// Render in canonical structural form
    pub fn render_structured(&self) -> Result<String, MalformedBlock> {
        match self {
            Self::Heading { level, text } => {
                let text = text.trim();
                if *level == 0 || text.is_empty() {
                    return Err(MalformedBlock("heading without level or text"));
                }
                Ok(format!("{} {text}", "#".repeat(*level)))
            }
            Self::Paragraph(text) | Self::List(text) | Self::Other(text) => {
                Ok(trim_line_ends(text))
            }
            Self::CodeBlock { info, body, closed } => {
                if !closed {
                    return Err(MalformedBlock("unterminated code fence"));
                }
                if body.is_empty() {
                    Ok(format!("{FENCE}{info}\n{FENCE}"))
                } else {
                    Ok(format!("{FENCE}{info}\n{body}\n{FENCE}"))
                }
            }
            Self::Table(rows) => {
                let mut columns = rows.iter().map(|row| table_columns(row));
                let first = columns.next().unwrap_or(0);
                if columns.any(|count| count != first) {
                    return Err(MalformedBlock("table rows disagree on column count"));
                }
                Ok(rows
                    .iter()
                    .map(|row| row.trim())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    /// Literal source text of the block, without normalization
    #[must_use]
    pub fn raw_text(&self) -> String {
        match self {
            Self::Heading { level, text } => {
                format!("{} {}", "#".repeat(*level), text).trim().to_string()
            }
            Self::Paragraph(text) | Self::List(text) | Self::Other(text) => text.clone(),
            Self::CodeBlock { info, body, closed } => {
                let mut raw = format!("{FENCE}{info}");
                if !body.is_empty() {
                    raw.push('\n');
                    raw.push_str(body);
                }
                if *closed {
                    raw.push('\n');
                    raw.push_str(FENCE);
                }
                raw
            }
            Self::Table(rows) => rows.join("\n"),
        }
    }
}

/// Parse text into blocks
#[must_use]
pub fn parse_blocks(text: &str) -> BlockParser<'_> {
    BlockParser::new(text)
}

/// Lazy block iterator over a document
#[derive(Debug, Clone)]
pub struct BlockParser<'a> {
    lines: Peekable<Lines<'a>>,
}

impl<'a> BlockParser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().peekable(),
        }
    }

    fn take_while_lines(&mut self, first: &'a str, keep: impl Fn(&str) -> bool) -> Vec<&'a str> {
        let mut out = vec![first];
        while let Some(&next) = self.lines.peek() {
            if !keep(next) {
                break;
            }
            out.push(next);
            self.lines.next();
        }
        out
    }

    fn code_block(&mut self, opening: &str) -> Block {
        let info = opening.trim_start()[FENCE.len()..].trim().to_string();
        let mut body = Vec::new();
        let mut closed = false;
        for line in self.lines.by_ref() {
            if is_fence(line) {
                closed = true;
                break;
            }
            body.push(line);
        }
        Block::CodeBlock {
            info,
            body: body.join("\n"),
            closed,
        }
    }
}

impl Iterator for BlockParser<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let line = loop {
            let line = self.lines.next()?;
            if !line.trim().is_empty() {
                break line;
            }
        };
        let trimmed = line.trim_start();

        if let Some((level, text)) = parse_heading(line) {
            return Some(Block::Heading { level, text });
        }

        if is_fence(line) {
            return Some(self.code_block(line));
        }

        if trimmed.starts_with('|') {
            let rows = self.take_while_lines(line, is_table_row);
            return Some(Block::Table(rows.into_iter().map(str::to_string).collect()));
        }

        if is_list_item(line) {
            let lines = self.take_while_lines(line, |next| {
                is_list_item(next)
                    || (next.starts_with(char::is_whitespace) && !next.trim().is_empty())
            });
            return Some(Block::List(lines.join("\n")));
        }

        if is_thematic_break(trimmed) {
            return Some(Block::Other(trimmed.trim_end().to_string()));
        }

        if trimmed.starts_with('>') {
            let lines = self.take_while_lines(line, |next| next.trim_start().starts_with('>'));
            return Some(Block::Other(lines.join("\n")));
        }

        let lines = self.take_while_lines(line, |next| {
            !next.trim().is_empty() && !starts_block(next)
        });
        Some(Block::Paragraph(lines.join("\n")))
    }
}

/// Parse `### Title ###` into `(3, "Title")`
fn parse_heading(line: &str) -> Option<(usize, String)> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let mut text = rest.trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.len() < text.len()
        && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
    {
        text = without_closing.trim_end();
    }

    if text.is_empty() {
        return None;
    }
    Some((level, text.to_string()))
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix(['-', '*', '+']) {
        return rest.starts_with([' ', '\t']) && !is_thematic_break(trimmed);
    }
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return false;
    }
    trimmed[digits..]
        .strip_prefix(['.', ')'])
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

fn is_thematic_break(trimmed: &str) -> bool {
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| compact.chars().all(|c| c == *marker))
}

fn starts_block(line: &str) -> bool {
    let trimmed = line.trim_start();
    parse_heading(line).is_some()
        || is_fence(line)
        || trimmed.starts_with('|')
        || trimmed.starts_with('>')
        || is_list_item(line)
        || is_thematic_break(trimmed)
}

fn table_columns(row: &str) -> usize {
    let row = row.trim();
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').count()
}

fn trim_line_ends(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}
