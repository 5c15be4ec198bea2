//! Mixin engine.
//!
//! `@mixin name($p: default, ...) { ... }` defines a parameterized body;
//! `@include name(arg, ...);` expands it at the include site. Expansion
//! re-reads the definition's statements in declaration order with the
//! parameters substituted, so the tree builder can classify them again in
//! their new scope.

use crate::substitute::substitute;
use crate::tree::{Document, NodeId};

/// Override keyword that keeps a parameter's default value.
pub const DEFAULT_KEYWORD: &str = "default";

/// A registered mixin: its parameters and the node holding its body.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinDefinition {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub node: NodeId,
}

impl MixinDefinition {
    /// Body statements in declaration order as `(line, text)` pairs, with
    /// every parameter token replaced.
    ///
    /// The definition's own closing brace and anything produced by an
    /// `@include` inside the body are left out; the `@include` line itself
    /// is kept so it expands again with the substituted arguments.
    pub fn expand(&self, doc: &Document, params: &[(String, String)]) -> Vec<(usize, String)> {
        let own_close: Vec<NodeId> = doc
            .get(self.node)
            .children
            .iter()
            .copied()
            .filter(|&id| doc.get(id).is_block_close())
            .collect();

        let mut body: Vec<NodeId> = doc
            .descendants(self.node)
            .into_iter()
            .filter(|id| !own_close.contains(id) && !doc.get(*id).expanded)
            .collect();
        body.sort_by_key(|&id| doc.get(id).source_index);

        body.into_iter()
            .map(|id| {
                let node = doc.get(id);
                let text = substitute(&node.raw, |token| {
                    params
                        .iter()
                        .find(|(key, _)| key == token)
                        .map(|(_, value)| value.as_str())
                });
                (node.line, text)
            })
            .collect()
    }
}

/// Mixins usable by `@include`, in registration order.
#[derive(Debug, Clone, Default)]
pub struct MixinRegistry {
    definitions: Vec<MixinDefinition>,
}

impl MixinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. The first definition of a name wins; a later
    /// one with the same name is ignored and `false` is returned.
    pub fn register(&mut self, definition: MixinDefinition) -> bool {
        if self.get(&definition.name).is_some() {
            return false;
        }
        self.definitions.push(definition);
        true
    }

    pub fn get(&self, name: &str) -> Option<&MixinDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Parsed `@mixin` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinHeader {
    pub name: String,
    pub params: Vec<(String, String)>,
}

/// Parsed `@include` directive. `args` is `None` when no parentheses were given.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDirective {
    pub name: String,
    pub args: Option<Vec<String>>,
}

pub fn is_mixin_definition(text: &str) -> bool {
    is_directive(text, "@mixin")
}

pub fn is_include(text: &str) -> bool {
    is_directive(text, "@include")
}

fn is_directive(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '(' || c == ';'))
}

/// Parse `@mixin name($a: 1, $b: 2) {`. `None` when the header is malformed.
pub fn parse_mixin_header(text: &str) -> Option<MixinHeader> {
    let rest = text.strip_prefix("@mixin")?.trim();
    let rest = rest.strip_suffix('{')?.trim_end();
    let open = rest.find('(')?;
    let close = rest.rfind(')')?;
    if close < open || !rest[close + 1..].trim().is_empty() {
        return None;
    }

    let name = rest[..open].trim();
    if !is_valid_name(name) {
        return None;
    }

    let mut params = Vec::new();
    for part in split_args(&rest[open + 1..close]) {
        let (key, default) = part.split_once(':')?;
        let key = key.trim();
        if !key.starts_with('$') || key.len() < 2 {
            return None;
        }
        params.push((key.to_string(), default.trim().to_string()));
    }

    Some(MixinHeader {
        name: name.to_string(),
        params,
    })
}

/// Parse `@include name;` or `@include name(a, b);`. `None` when malformed.
pub fn parse_include(text: &str) -> Option<IncludeDirective> {
    let rest = text.strip_prefix("@include")?.trim();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();

    let (name, args) = match rest.find('(') {
        Some(open) => {
            let inner = rest[open + 1..].strip_suffix(')')?;
            (rest[..open].trim(), Some(split_args(inner)))
        }
        None => (rest, None),
    };

    if !is_valid_name(name) {
        return None;
    }

    Some(IncludeDirective {
        name: name.to_string(),
        args,
    })
}

/// Apply positional include arguments over the declared defaults.
///
/// Missing arguments and the `default` keyword keep the declared default.
pub fn resolve_params(
    defaults: &[(String, String)],
    args: Option<&[String]>,
) -> Vec<(String, String)> {
    let args = args.unwrap_or(&[]);
    defaults
        .iter()
        .enumerate()
        .map(|(idx, (key, default))| {
            let value = match args.get(idx).map(|a| a.trim()) {
                Some(arg) if !arg.is_empty() && arg != DEFAULT_KEYWORD => arg.to_string(),
                _ => default.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Split a comma-separated list, ignoring commas inside quotes or parentheses.
/// An all-whitespace list yields no items.
fn split_args(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for ch in text.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    parts.push(current.trim().to_string());
    parts
}
