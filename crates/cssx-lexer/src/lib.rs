//! CSSX Line Analyzer
//!
//! Splits `.cssx` source text into logical statement lines.
//! Each statement is one complete directive: an element or rule opener
//! ending in `{`, a declaration ending in `;`, a lone `}`, or a `//` comment.
//! Declarations continued across physical lines are merged back together.
//!
//! # Example
//!
//! ```
//! use cssx_lexer::Scanner;
//!
//! let lines = Scanner::analyze("div { color: red; }").unwrap();
//! assert_eq!(lines.len(), 3);
//! ```

pub mod line;
pub mod scanner;

pub use line::{LogicalLine, COMMENT_MARKER};
pub use scanner::Scanner;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    /// The statement being read when the error occurred.
    pub text: String,
}
