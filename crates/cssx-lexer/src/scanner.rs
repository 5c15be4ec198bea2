use crate::line::{LogicalLine, COMMENT_MARKER};
use crate::LexerError;

/// CSSX line analyzer.
///
/// Walks physical lines character by character and cuts them into
/// logical statements. Outside quotes and parentheses:
/// - `;` ends a statement (and stays part of it)
/// - `{` ends a statement (and stays part of it)
/// - `}` is always a statement of its own
///
/// A physical line that ends mid-statement is joined with the next one
/// (single space) when it is still inside a quote or parenthesis, ends
/// with `,`, or holds a `name: value` declaration with no terminator yet.
/// A declaration with an empty value (`--onclick:`) is left alone; the
/// tree builder accumulates those itself.
pub struct Scanner {
    statements: Vec<LogicalLine>,
    buffer: String,
    start_line: usize,
    quote: Option<char>,
    paren_depth: usize,
    line: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            statements: Vec::new(),
            buffer: String::new(),
            start_line: 0,
            quote: None,
            paren_depth: 0,
            line: 0,
        }
    }

    /// Analyze a whole source text.
    pub fn analyze(source: &str) -> Result<Vec<LogicalLine>, LexerError> {
        Self::analyze_lines(source.lines().enumerate().map(|(idx, text)| (idx + 1, text)))
    }

    /// Analyze already-numbered lines. Used when statements are re-fed
    /// (mixin expansion, imports) and must keep their original positions.
    pub fn analyze_lines<I, S>(lines: I) -> Result<Vec<LogicalLine>, LexerError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut scanner = Scanner::new();
        for (line, text) in lines {
            scanner.scan_line(line, text.as_ref());
        }
        scanner.finish()
    }

    fn scan_line(&mut self, line: usize, text: &str) {
        self.line = line;
        let chars: Vec<char> = text.trim().chars().collect();
        let mut pos = 0;

        while pos < chars.len() {
            let ch = chars[pos];

            if let Some(quote) = self.quote {
                self.push(ch);
                if ch == '\\' {
                    if let Some(&escaped) = chars.get(pos + 1) {
                        self.push(escaped);
                        pos += 1;
                    }
                } else if ch == quote {
                    self.quote = None;
                }
                pos += 1;
                continue;
            }

            // Comments run to the end of the physical line
            if self.buffer.trim().is_empty()
                && ch == '/'
                && chars.get(pos + 1) == Some(&'/')
            {
                let comment: String = chars[pos..].iter().collect();
                self.buffer.clear();
                self.push_str(&comment);
                self.flush();
                return;
            }

            match ch {
                '"' | '\''
                    if !self.follows_word()
                        && (ch == '"' || closed_on_line(&chars[pos + 1..])) =>
                {
                    self.quote = Some(ch);
                    self.push(ch);
                }
                '(' => {
                    self.paren_depth += 1;
                    self.push(ch);
                }
                ')' => {
                    self.paren_depth = self.paren_depth.saturating_sub(1);
                    self.push(ch);
                }
                ';' if self.paren_depth == 0 => {
                    self.push(ch);
                    self.flush();
                }
                '{' if self.paren_depth == 0 => {
                    self.push(ch);
                    self.flush_opener();
                }
                '}' if self.paren_depth == 0 => {
                    self.flush();
                    self.push(ch);
                    self.flush();
                }
                _ => self.push(ch),
            }
            pos += 1;
        }

        if self.quote.is_some() || self.paren_depth > 0 || self.is_continued() {
            if !self.buffer.is_empty() {
                self.buffer.push(' ');
            }
        } else {
            self.flush();
        }
    }

    fn finish(mut self) -> Result<Vec<LogicalLine>, LexerError> {
        if self.quote.is_some() {
            return Err(LexerError {
                message: "Unterminated string".into(),
                line: self.start_line,
                text: self.buffer.trim().to_string(),
            });
        }
        self.flush();
        Ok(self.statements)
    }

    // --- Statement boundaries ---

    /// Whether the pending statement carries on onto the next physical line.
    fn is_continued(&self) -> bool {
        let pending = self.buffer.trim();
        if pending.is_empty() {
            return false;
        }
        pending.ends_with(',') || is_dangling_declaration(pending)
    }

    fn flush(&mut self) {
        let text = self.buffer.trim();
        if !text.is_empty() && text != ";" {
            self.statements
                .push(LogicalLine::new(text.to_string(), self.start_line));
        }
        self.buffer.clear();
    }

    /// Flush a statement ending in `{`. A `{` standing alone on its line is
    /// attached to the statement before it (`div` + `{` is `div {`).
    fn flush_opener(&mut self) {
        if self.buffer.trim() == "{" {
            if let Some(previous) = self.statements.last_mut() {
                let attachable = !previous.is_comment()
                    && !previous.text.ends_with(';')
                    && !previous.text.ends_with('{')
                    && !previous.text.ends_with('}');
                if attachable {
                    previous.text.push_str(" {");
                    self.buffer.clear();
                    return;
                }
            }
        }
        self.flush();
    }

    // --- Helpers ---

    fn push(&mut self, ch: char) {
        if self.buffer.trim().is_empty() {
            self.start_line = self.line;
        }
        self.buffer.push(ch);
    }

    fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push(ch);
        }
    }

    /// A quote directly after a letter or digit is an apostrophe, not a string.
    fn follows_word(&self) -> bool {
        self.buffer
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric())
    }
}

/// A single quote only opens a string when it is closed on the same
/// physical line, so `'tis` in plain text stays text.
fn closed_on_line(rest: &[char]) -> bool {
    rest.contains(&'\'')
}

/// `name: value` with a non-empty value and no terminator.
fn is_dangling_declaration(text: &str) -> bool {
    if text.starts_with(COMMENT_MARKER) || text.starts_with('@') {
        return false;
    }
    let name_len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '$'))
        .unwrap_or(text.len());
    if name_len == 0 {
        return false;
    }
    let rest = text[name_len..].trim_start();
    match rest.strip_prefix(':') {
        Some(value) => !value.trim().is_empty(),
        None => false,
    }
}
