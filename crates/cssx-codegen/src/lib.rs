//! CSSX Code Generator
//!
//! Compiles a CSSX source into two outputs from one document forest: an
//! HTML fragment and a CSS stylesheet.
//!
//! ```text
//! source → Parser → Document → VariableTable::collect → html::generate / css::generate
//! ```
//!
//! ```
//! use std::path::Path;
//!
//! let out = cssx_codegen::compile(
//!     "div.card {\n  --id: \"x\";\n  margin: 10px;\n}",
//!     Path::new("."),
//!     &cssx_codegen::CompileOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(out.html, "<div class=\"card\" id=\"x\">\n</div>");
//! assert_eq!(out.css, "div.card {\n    margin: 10px;\n}");
//! ```

pub mod css;
pub mod html;
pub mod variables;

use std::collections::BTreeMap;
use std::path::Path;

use cssx_parser::{
    Document, FsLoader, ParseError, ParseOptions, Parser, SourceLoader, DEFAULT_MAX_IMPORT_DEPTH,
};

pub use variables::{Resolver, VariableTable, BUILTIN_VARIABLES};

/// One indentation level in both outputs.
pub(crate) const INDENT: &str = "    ";

/// The compiled output from a CSSX document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    pub html: String,
    pub css: String,
}

/// Compilation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Substituted before the document's own variables, keyed `$name`.
    pub variables: BTreeMap<String, String>,
    pub max_import_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

impl CompileOptions {
    /// Add an override. The leading `$` is optional.
    pub fn variable(mut self, name: &str, value: impl Into<String>) -> Self {
        let key = if name.starts_with('$') {
            name.to_string()
        } else {
            format!("${name}")
        };
        self.variables.insert(key, value.into());
        self
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_import_depth: self.max_import_depth,
        }
    }
}

/// Code generation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Codegen error: {message}")]
pub struct CodegenError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Compile `source` to an HTML fragment, reading imports relative to `base_dir`.
pub fn parse_html(source: &str, base_dir: &Path) -> Result<String, CompileError> {
    parse_html_with(source, base_dir, &FsLoader, &CompileOptions::default())
}

/// Compile `source` to a stylesheet, reading imports relative to `base_dir`.
pub fn parse_css(source: &str, base_dir: &Path) -> Result<String, CompileError> {
    parse_css_with(source, base_dir, &FsLoader, &CompileOptions::default())
}

/// Compile `source` to both outputs from a single parse.
pub fn compile(
    source: &str,
    base_dir: &Path,
    options: &CompileOptions,
) -> Result<CompilerOutput, CompileError> {
    compile_with(source, base_dir, &FsLoader, options)
}

pub fn parse_html_with(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    let mut doc = build(source, base_dir, loader, options)?;
    let table = VariableTable::collect(&mut doc);
    let resolver = Resolver::new(&options.variables, &table);
    Ok(html::generate(&doc, &resolver)?)
}

pub fn parse_css_with(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    let mut doc = build(source, base_dir, loader, options)?;
    let table = VariableTable::collect(&mut doc);
    let resolver = Resolver::new(&options.variables, &table);
    Ok(css::generate(&doc, &resolver)?)
}

pub fn compile_with(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    options: &CompileOptions,
) -> Result<CompilerOutput, CompileError> {
    let mut doc = build(source, base_dir, loader, options)?;
    let table = VariableTable::collect(&mut doc);
    let resolver = Resolver::new(&options.variables, &table);

    Ok(CompilerOutput {
        html: html::generate(&doc, &resolver)?,
        css: css::generate(&doc, &resolver)?,
    })
}

fn build(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    options: &CompileOptions,
) -> Result<Document, ParseError> {
    Parser::parse_with(source, base_dir, loader, options.parse_options())
}
