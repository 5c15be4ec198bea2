//! Tree builder for CSSX.
//!
//! Consumes logical lines (from `cssx-lexer`) and produces a [`Document`].
//! One pass, in declaration order, carrying the open-block stack, the mixin
//! registry and any multi-line attribute still being accumulated.
//! `@import`ed files and expanded `@include` bodies are fed through the same
//! pass at the current scope.

use std::path::{Path, PathBuf};

use cssx_lexer::{LogicalLine, Scanner};
use tracing::{debug, trace};

use crate::classify::{self, Classification, Scope};
use crate::loader::{normalize, FsLoader, SourceLoader};
use crate::mixin::{self, MixinDefinition, MixinRegistry};
use crate::tree::{Document, NodeId, NodeKind, TreeNode};
use crate::{ParseError, ParseErrorKind, ParseOptions};

/// A `--name:` line with an empty value whose continuation lines are
/// still being collected.
struct OpenAttribute {
    name: String,
    line: usize,
    text: String,
}

/// CSSX tree builder.
///
/// All state lives on the parser and is dropped with it, so separate
/// parses never observe each other.
pub struct Parser<'a> {
    doc: Document,
    scopes: Vec<NodeId>,
    /// Scope depth a nested feed (import or expansion) may not close below.
    scope_floor: usize,
    mixins: MixinRegistry,
    open_attribute: Option<OpenAttribute>,
    /// Files currently being imported, outermost first.
    imports: Vec<PathBuf>,
    /// Mixins currently being expanded, outermost first.
    expansions: Vec<String>,
    loader: &'a dyn SourceLoader,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a parser that resolves imports through `loader`.
    pub fn new(loader: &'a dyn SourceLoader, options: ParseOptions) -> Self {
        Self {
            doc: Document::new(),
            scopes: Vec::new(),
            scope_floor: 0,
            mixins: MixinRegistry::new(),
            open_attribute: None,
            imports: Vec::new(),
            expansions: Vec::new(),
            loader,
            options,
        }
    }

    /// Parse source with imports read from the filesystem, relative to `base_dir`.
    pub fn parse(source: &str, base_dir: &Path) -> Result<Document, ParseError> {
        Parser::new(&FsLoader, ParseOptions::default()).parse_source(source, base_dir)
    }

    /// Parse source with a custom loader and options.
    pub fn parse_with(
        source: &str,
        base_dir: &Path,
        loader: &'a dyn SourceLoader,
        options: ParseOptions,
    ) -> Result<Document, ParseError> {
        Parser::new(loader, options).parse_source(source, base_dir)
    }

    /// Run the whole pass over `source` and hand back the finished forest.
    pub fn parse_source(mut self, source: &str, base_dir: &Path) -> Result<Document, ParseError> {
        let lines = Scanner::analyze(source)?;
        self.parse_lines(lines, base_dir)?;
        self.finish()
    }

    fn finish(self) -> Result<Document, ParseError> {
        if let Some(open) = self.open_attribute {
            return Err(ParseError::new(
                ParseErrorKind::UnterminatedAttribute { name: open.name },
                open.line,
                open.text,
            ));
        }
        if let Some(&unclosed) = self.scopes.last() {
            let node = self.doc.get(unclosed);
            return Err(ParseError::new(
                ParseErrorKind::UnbalancedBraces,
                node.line,
                node.raw.clone(),
            ));
        }

        debug!(
            nodes = self.doc.len(),
            roots = self.doc.roots().len(),
            mixins = self.mixins.len(),
            "tree built"
        );
        Ok(self.doc)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_lines(&mut self, lines: Vec<LogicalLine>, base_dir: &Path) -> Result<(), ParseError> {
        for line in lines {
            self.parse_line(line, base_dir)?;
        }
        Ok(())
    }

    fn parse_line(&mut self, line: LogicalLine, base_dir: &Path) -> Result<(), ParseError> {
        if line.is_comment() {
            return Ok(());
        }
        trace!(line = line.line, text = %line.text, "statement");

        if let Some(open) = &self.open_attribute {
            if line.closes_block() {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedAttribute {
                        name: open.name.clone(),
                    },
                    open.line,
                    open.text.clone(),
                ));
            }
            return self.continue_attribute(line);
        }

        if is_import(&line.text) {
            return self.parse_import(&line, base_dir);
        }

        if line.closes_block() && self.scopes.len() <= self.scope_floor {
            return Err(self.error(ParseErrorKind::UnbalancedBraces, &line));
        }

        let parent = self.scopes.last().copied();

        if mixin::is_mixin_definition(&line.text) {
            return self.parse_mixin(&line, parent);
        }
        if mixin::is_include(&line.text) {
            return self.parse_include(&line, parent, base_dir);
        }

        let mut kind = self.classify(&line.text);
        if let NodeKind::Attribute {
            name,
            value,
            multiline_open,
            ..
        } = &mut kind
        {
            if value.is_empty() {
                *multiline_open = true;
                self.open_attribute = Some(OpenAttribute {
                    name: name.clone(),
                    line: line.line,
                    text: line.text.clone(),
                });
            }
        }

        let id = self.add_node(&line, kind, parent, false);
        if line.opens_block() {
            self.scopes.push(id);
        } else if line.closes_block() {
            self.close_block();
        }
        Ok(())
    }

    fn classify(&self, text: &str) -> NodeKind {
        match classify::classify(text, self.scope()) {
            Classification::Element { tag, class } => NodeKind::Element { tag, class },
            Classification::Attribute {
                name,
                value,
                is_event,
            } => NodeKind::Attribute {
                name,
                value,
                is_event,
                multiline_open: false,
            },
            Classification::Generic => NodeKind::Generic,
        }
    }

    /// Classification context from the innermost open block.
    fn scope(&self) -> Scope<'_> {
        match self.scopes.last().map(|&id| &self.doc.get(id).kind) {
            None => Scope::Root,
            Some(NodeKind::Element { tag, .. }) => Scope::Element(tag),
            Some(NodeKind::Mixin { .. }) => Scope::Mixin,
            Some(_) => Scope::Block,
        }
    }

    fn add_node(
        &mut self,
        line: &LogicalLine,
        kind: NodeKind,
        parent: Option<NodeId>,
        suppressed: bool,
    ) -> NodeId {
        let mut node = TreeNode::new(line.text.clone(), kind, line.line);
        node.suppressed = suppressed;
        node.expanded = !self.expansions.is_empty();
        let id = self.doc.alloc(node);
        self.doc.attach(parent, id);
        id
    }

    /// Pop the innermost block. A closing mixin becomes usable from here on.
    fn close_block(&mut self) {
        let Some(closed) = self.scopes.pop() else {
            return;
        };
        if let NodeKind::Mixin { name, params } = &self.doc.get(closed).kind {
            let definition = MixinDefinition {
                name: name.clone(),
                params: params.clone(),
                node: closed,
            };
            let name = definition.name.clone();
            let param_count = definition.params.len();
            if self.mixins.register(definition) {
                debug!(mixin = %name, params = param_count, "registered mixin");
            } else {
                debug!(mixin = %name, "mixin already defined, keeping the first definition");
            }
        }
    }

    // =========================================================================
    // Multi-line attributes
    // =========================================================================

    /// Treat `line` as the next piece of the open attribute's value.
    /// A piece ending in `";` closes the attribute.
    fn continue_attribute(&mut self, line: LogicalLine) -> Result<(), ParseError> {
        let Some(open) = &self.open_attribute else {
            return Ok(());
        };
        let prefixed = format!("--{}: {}", open.name, line.text);
        let kind = self.classify(&prefixed);
        let parent = self.scopes.last().copied();
        self.add_node(&line, kind, parent, false);

        if line.text.trim_end().ends_with("\";") {
            self.open_attribute = None;
        }
        Ok(())
    }

    // =========================================================================
    // Mixins
    // =========================================================================

    fn parse_mixin(&mut self, line: &LogicalLine, parent: Option<NodeId>) -> Result<(), ParseError> {
        let header = mixin::parse_mixin_header(&line.text)
            .ok_or_else(|| self.error(ParseErrorKind::MalformedMixinDeclaration, line))?;
        let kind = NodeKind::Mixin {
            name: header.name,
            params: header.params,
        };
        let id = self.add_node(line, kind, parent, true);
        self.scopes.push(id);
        Ok(())
    }

    fn parse_include(
        &mut self,
        line: &LogicalLine,
        parent: Option<NodeId>,
        base_dir: &Path,
    ) -> Result<(), ParseError> {
        let directive = mixin::parse_include(&line.text)
            .ok_or_else(|| self.error(ParseErrorKind::MalformedIncludeDirective, line))?;
        self.add_node(line, NodeKind::Generic, parent, true);

        let Some(definition) = self.mixins.get(&directive.name).cloned() else {
            debug!(mixin = %directive.name, line = line.line, "unknown mixin, include dropped");
            return Ok(());
        };
        if self.expansions.contains(&directive.name) {
            return Err(self.error(
                ParseErrorKind::RecursiveInclude {
                    name: directive.name,
                },
                line,
            ));
        }

        let params = mixin::resolve_params(&definition.params, directive.args.as_deref());
        let body = definition.expand(&self.doc, &params);
        debug!(mixin = %directive.name, lines = body.len(), "expanding mixin");
        let lines = Scanner::analyze_lines(body)?;

        self.expansions.push(directive.name);
        let result = self.parse_nested(lines, base_dir, line);
        self.expansions.pop();
        result
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import(&mut self, line: &LogicalLine, base_dir: &Path) -> Result<(), ParseError> {
        let target = import_path(&line.text)
            .ok_or_else(|| self.error(ParseErrorKind::MalformedImportDirective, line))?;
        let resolved = normalize(&base_dir.join(target));

        if self.imports.len() >= self.options.max_import_depth {
            return Err(self.error(
                ParseErrorKind::ImportDepthExceeded {
                    limit: self.options.max_import_depth,
                },
                line,
            ));
        }
        if self.imports.contains(&resolved) {
            return Err(self.error(ParseErrorKind::ImportCycle { path: resolved }, line));
        }

        let source = self.loader.load(&resolved).map_err(|e| {
            self.error(
                ParseErrorKind::ImportNotFound {
                    path: resolved.clone(),
                    reason: e.to_string(),
                },
                line,
            )
        })?;
        debug!(path = %resolved.display(), depth = self.imports.len() + 1, "importing");

        let lines = Scanner::analyze(&source)?;
        let import_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();

        self.imports.push(resolved);
        let result = self.parse_nested(lines, &import_dir, line);
        self.imports.pop();
        result
    }

    /// Feed a nested statement list at the current scope. It must leave the
    /// block stack and the attribute state exactly as it found them.
    fn parse_nested(
        &mut self,
        lines: Vec<LogicalLine>,
        base_dir: &Path,
        origin: &LogicalLine,
    ) -> Result<(), ParseError> {
        let floor = std::mem::replace(&mut self.scope_floor, self.scopes.len());
        let result = self.parse_lines(lines, base_dir);
        let balanced = self.scopes.len() == self.scope_floor;
        self.scope_floor = floor;
        result?;

        if let Some(open) = self.open_attribute.take() {
            return Err(ParseError::new(
                ParseErrorKind::UnterminatedAttribute { name: open.name },
                open.line,
                open.text,
            ));
        }
        if !balanced {
            return Err(self.error(ParseErrorKind::UnbalancedBraces, origin));
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn error(&self, kind: ParseErrorKind, line: &LogicalLine) -> ParseError {
        ParseError::new(kind, line.line, line.text.clone())
    }
}

fn is_import(text: &str) -> bool {
    text.strip_prefix("@import")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '\'' || c == '"'))
}

/// The quoted path of `@import 'path';`.
fn import_path(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("@import")?.trim();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let path = rest[1..].strip_suffix(quote)?.trim();
    (!path.is_empty()).then_some(path)
}
