//! Variable table.
//!
//! `$name: value;` lines anywhere in the tree declare file-wide variables.
//! They are pulled out of the output and every `$name` token in emitted
//! text is replaced, after any caller-supplied overrides.

use std::collections::{BTreeMap, HashMap};

use cssx_parser::substitute::substitute;
use cssx_parser::{Document, NodeKind};
use tracing::debug;

/// Bindings present in every table. The two accessors read and write
/// custom properties on the first rule of `<style id="stylesheet">`.
pub const BUILTIN_VARIABLES: [(&str, &str); 4] = [
    (
        "$setVariable",
        "document.getElementById('stylesheet').sheet.cssRules[0].style.setProperty",
    ),
    (
        "$getVariable",
        "document.getElementById('stylesheet').sheet.cssRules[0].style.getPropertyValue",
    ),
    ("$parseObject", "JSON.parse"),
    ("$stringifyObject", "JSON.stringify"),
];

/// Variables discovered in one document, seeded with the built-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    entries: HashMap<String, String>,
}

impl Default for VariableTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN_VARIABLES
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every declaration in `doc` and suppress its node.
    /// A later declaration of the same name replaces an earlier one.
    pub fn collect(doc: &mut Document) -> Self {
        let mut table = Self::new();
        let ids: Vec<_> = doc.ids().collect();
        for id in ids {
            let node = doc.get(id);
            if !matches!(node.kind, NodeKind::Generic) {
                continue;
            }
            let Some((name, value)) = parse_declaration(&node.raw) else {
                continue;
            };
            let (name, value) = (name.to_string(), value.to_string());
            table.insert(name, value);
            doc.get_mut(id).suppressed = true;
        }
        debug!(variables = table.len(), "variable table built");
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Caller overrides first, then the document table.
///
/// A value may name another variable (`$a: $b;`), so the two passes repeat
/// until the text stops changing. A reference cycle stops after one pass per
/// known variable and leaves the remaining tokens in place.
pub struct Resolver<'a> {
    overrides: &'a BTreeMap<String, String>,
    table: &'a VariableTable,
}

impl<'a> Resolver<'a> {
    pub fn new(overrides: &'a BTreeMap<String, String>, table: &'a VariableTable) -> Self {
        Self { overrides, table }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut current = self.pass(text);
        for _ in 0..self.overrides.len() + self.table.len() {
            let next = self.pass(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn pass(&self, text: &str) -> String {
        let first = substitute(text, |token| self.overrides.get(token).map(String::as_str));
        substitute(&first, |token| self.table.get(token))
    }
}

/// `$name: value;` split into name and value.
fn parse_declaration(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('$') {
        return None;
    }
    let (name, rest) = text.split_once(':')?;
    let name = name.trim_end();
    if name.len() < 2 || name.contains(char::is_whitespace) {
        return None;
    }
    let value = rest.trim().strip_suffix(';')?.trim_end();
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssx_parser::{MemoryLoader, ParseOptions, Parser};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(source: &str) -> Document {
        Parser::parse_with(source, Path::new(""), &MemoryLoader::new(), ParseOptions::default())
            .unwrap()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    #[test]
    fn test_parse_declaration() {
        assert_eq!(parse_declaration("$color: #333;"), Some(("$color", "#333")));
        assert_eq!(
            parse_declaration("$font : \"Arial, sans\";"),
            Some(("$font", "\"Arial, sans\""))
        );
        assert_eq!(parse_declaration("$color #333;"), None);
        assert_eq!(parse_declaration("$color: #333"), None);
        assert_eq!(parse_declaration("color: $color;"), None);
    }

    #[test]
    fn test_builtins_seeded() {
        let table = VariableTable::new();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("$parseObject"), Some("JSON.parse"));
        assert_eq!(table.get("$stringifyObject"), Some("JSON.stringify"));
    }

    // =========================================================================
    // Collection
    // =========================================================================

    #[test]
    fn test_collect_at_any_depth() {
        let mut doc = parse("div {\n  span {\n    $color: red;\n  }\n}\n$gap: 4px;");
        let table = VariableTable::collect(&mut doc);
        assert_eq!(table.get("$color"), Some("red"));
        assert_eq!(table.get("$gap"), Some("4px"));
        assert_eq!(table.len(), 6);

        let suppressed: Vec<&str> = doc
            .ids()
            .filter(|&id| doc.get(id).suppressed)
            .map(|id| doc.get(id).raw.as_str())
            .collect();
        assert_eq!(suppressed, vec!["$color: red;", "$gap: 4px;"]);
    }

    #[test]
    fn test_later_declaration_wins() {
        let mut doc = parse("$c: red;\n$c: blue;");
        assert_eq!(VariableTable::collect(&mut doc).get("$c"), Some("blue"));
    }

    #[test]
    fn test_builtin_can_be_redeclared() {
        let mut doc = parse("$parseObject: myParse;");
        assert_eq!(VariableTable::collect(&mut doc).get("$parseObject"), Some("myParse"));
    }

    // =========================================================================
    // Resolver
    // =========================================================================

    #[test]
    fn test_overrides_run_first() {
        let mut table = VariableTable::new();
        table.insert("$brand", "#ff0");
        table.insert("$accent", "blue");
        let overrides = BTreeMap::from([
            ("$accent".to_string(), "$brand".to_string()),
        ]);
        let resolver = Resolver::new(&overrides, &table);
        assert_eq!(resolver.apply("color: $accent;"), "color: #ff0;");
    }

    #[test]
    fn test_value_naming_another_variable() {
        let mut doc = parse("$a: $b;\n$b: red;\np {\n  color: $a;\n}");
        let table = VariableTable::collect(&mut doc);
        let overrides = BTreeMap::new();
        let resolver = Resolver::new(&overrides, &table);
        assert_eq!(resolver.apply("color: $a;"), "color: red;");
    }

    #[test]
    fn test_override_reached_through_table_value() {
        let mut table = VariableTable::new();
        table.insert("$accent", "$brand");
        let overrides = BTreeMap::from([("$brand".to_string(), "#ff0".to_string())]);
        let resolver = Resolver::new(&overrides, &table);
        assert_eq!(resolver.apply("color: $accent;"), "color: #ff0;");
    }

    #[test]
    fn test_reference_cycle_terminates() {
        let mut table = VariableTable::new();
        table.insert("$a", "$b");
        table.insert("$b", "$a");
        let overrides = BTreeMap::new();
        let resolver = Resolver::new(&overrides, &table);
        let out = resolver.apply("x: $a;");
        assert!(out == "x: $a;" || out == "x: $b;", "{out}");
    }

    #[test]
    fn test_builtin_in_handler() {
        let table = VariableTable::new();
        let overrides = BTreeMap::new();
        let resolver = Resolver::new(&overrides, &table);
        assert_eq!(
            resolver.apply("$getVariable('--x')"),
            "document.getElementById('stylesheet').sheet.cssRules[0].style.getPropertyValue('--x')"
        );
    }
}
