/// Marker that starts a comment statement.
pub const COMMENT_MARKER: &str = "//";

/// One complete statement produced by the line analyzer.
///
/// `line` is the 1-based physical line the statement starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub line: usize,
}

impl LogicalLine {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.text.starts_with(COMMENT_MARKER)
    }

    /// True when the statement opens a block (`div {`, `@media (...) {`).
    pub fn opens_block(&self) -> bool {
        self.text.ends_with('{')
    }

    /// True for a lone `}`.
    pub fn closes_block(&self) -> bool {
        self.text == "}"
    }
}
