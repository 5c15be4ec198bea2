//! CSSX Parser
//!
//! Builds the node forest for a `.cssx` file from the line analyzer's
//! statements: classifies each statement, tracks open blocks, inlines
//! `@import`ed files, and expands `@include`d mixins.
//!
//! The resulting [`Document`] is shared by the HTML and CSS emitters in
//! `cssx-codegen`, which render disjoint parts of it.

pub mod classify;
pub mod loader;
pub mod mixin;
pub mod parser;
pub mod substitute;
pub mod tree;
pub mod vocab;

use std::path::PathBuf;

pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use parser::Parser;
pub use tree::{Document, NodeId, NodeKind, TreeNode};

/// Default bound on nested `@import` depth.
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 32;

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_import_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

/// What went wrong while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("malformed @mixin declaration, expected `@mixin name($param: default) {{`")]
    MalformedMixinDeclaration,

    #[error("malformed @include directive, expected `@include name;` or `@include name(args);`")]
    MalformedIncludeDirective,

    #[error("malformed @import directive, expected `@import 'path';`")]
    MalformedImportDirective,

    #[error("cannot import '{}': {reason}", .path.display())]
    ImportNotFound { path: PathBuf, reason: String },

    #[error("import cycle through '{}'", .path.display())]
    ImportCycle { path: PathBuf },

    #[error("imports nested deeper than {limit} levels")]
    ImportDepthExceeded { limit: usize },

    #[error("mixin '{name}' includes itself")]
    RecursiveInclude { name: String },

    #[error("multi-line attribute '--{name}' is never closed with `\";`")]
    UnterminatedAttribute { name: String },

    #[error("unterminated string")]
    UnterminatedString,
}

/// Parser error with the offending statement and its position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {line} (`{text}`): {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub text: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            text: text.into(),
        }
    }
}

impl From<cssx_lexer::LexerError> for ParseError {
    fn from(e: cssx_lexer::LexerError) -> Self {
        ParseError::new(ParseErrorKind::UnterminatedString, e.line, e.text)
    }
}
