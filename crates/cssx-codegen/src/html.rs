//! HTML code generator.
//!
//! Walks the document forest and renders elements, their attributes and
//! `--text` content. Every other line (declarations, rule blocks, mixins)
//! produces no markup, though its children are still visited.

use cssx_parser::classify::{is_text_marker, text_content};
use cssx_parser::vocab::is_void_element;
use cssx_parser::{Document, NodeId, NodeKind, TreeNode};

use crate::variables::Resolver;
use crate::{CodegenError, INDENT};

/// A rendered open tag waiting for its `}`.
struct OpenTag {
    tag: String,
    depth: usize,
    line: usize,
}

struct HtmlEmitter<'a> {
    doc: &'a Document,
    resolver: &'a Resolver<'a>,
    lines: Vec<String>,
    open: Vec<OpenTag>,
}

/// Generate the HTML fragment for a document.
pub fn generate(doc: &Document, resolver: &Resolver<'_>) -> Result<String, CodegenError> {
    let mut emitter = HtmlEmitter {
        doc,
        resolver,
        lines: Vec::new(),
        open: Vec::new(),
    };
    for &root in doc.roots() {
        emitter.walk(root, 0);
    }

    if let Some(unclosed) = emitter.open.last() {
        return Err(CodegenError {
            message: format!(
                "element <{}> opened at line {} has no closing brace",
                unclosed.tag, unclosed.line
            ),
        });
    }
    Ok(emitter.lines.join("\n"))
}

impl HtmlEmitter<'_> {
    fn walk(&mut self, id: NodeId, depth: usize) {
        let doc = self.doc;
        let node = doc.get(id);
        if node.suppressed {
            return;
        }

        match &node.kind {
            NodeKind::Element { tag, class } => self.element(node, tag, class.as_deref(), depth),
            NodeKind::Attribute { .. } => return,
            _ if node.is_block_close() => self.close(depth),
            _ if is_text_marker(&node.raw) => {
                if let Some(text) = text_content(&self.resolver.apply(&node.raw)) {
                    self.push(depth, text);
                }
            }
            _ => {}
        }

        for &child in &node.children {
            self.walk(child, depth + 1);
        }
    }

    fn element(&mut self, node: &TreeNode, tag: &str, class: Option<&str>, depth: usize) {
        let open = open_tag(tag, &self.attributes(node, class));
        let void = is_void_element(tag);

        if node.raw.trim_end().ends_with('{') {
            self.push(depth, open);
            self.open.push(OpenTag {
                tag: tag.to_string(),
                depth,
                line: node.line,
            });
        } else if void {
            self.push(depth, open);
        } else {
            self.push(depth, format!("{open}</{tag}>"));
        }
    }

    /// A `}` one level below the innermost open tag closes it.
    fn close(&mut self, depth: usize) {
        let matches = self
            .open
            .last()
            .is_some_and(|top| top.depth + 1 == depth);
        if !matches {
            return;
        }
        if let Some(top) = self.open.pop() {
            if !is_void_element(&top.tag) {
                self.push(top.depth, format!("</{}>", top.tag));
            }
        }
    }

    /// Fold the element's attribute nodes into `(name, value)` pairs in
    /// first-declared order. Event handlers accumulate, everything else is
    /// last-wins.
    fn attributes(&self, node: &TreeNode, class: Option<&str>) -> Vec<(String, String)> {
        let mut attrs: Vec<(String, String)> = Vec::new();
        if let Some(class) = class {
            attrs.push(("class".to_string(), self.resolver.apply(class)));
        }

        for &attr in &node.attrs {
            let attr = self.doc.get(attr);
            let NodeKind::Attribute {
                name,
                value,
                is_event,
                multiline_open,
            } = &attr.kind
            else {
                continue;
            };
            if *multiline_open || attr.suppressed {
                continue;
            }

            let value = self.resolver.apply(value);
            match attrs.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, current)) if *is_event && !current.is_empty() => {
                    current.push(' ');
                    current.push_str(&value);
                }
                Some((_, current)) => *current = value,
                None => attrs.push((name.clone(), value)),
            }
        }
        attrs
    }

    fn push(&mut self, depth: usize, text: String) {
        self.lines.push(format!("{}{}", INDENT.repeat(depth), text));
    }
}

fn open_tag(tag: &str, attrs: &[(String, String)]) -> String {
    let mut out = format!("<{tag}");
    for (name, value) in attrs {
        out.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
    }
    out.push('>');
    out
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::VariableTable;
    use cssx_parser::{MemoryLoader, ParseOptions, Parser};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn html(source: &str) -> String {
        let mut doc =
            Parser::parse_with(source, Path::new(""), &MemoryLoader::new(), ParseOptions::default())
                .unwrap();
        let table = VariableTable::collect(&mut doc);
        let overrides = BTreeMap::new();
        generate(&doc, &Resolver::new(&overrides, &table)).unwrap()
    }

    // =========================================================================
    // Elements
    // =========================================================================

    #[test]
    fn test_empty_document() {
        assert_eq!(html(""), "");
    }

    #[test]
    fn test_bare_element() {
        assert_eq!(html("div {\n}"), "<div>\n</div>");
    }

    #[test]
    fn test_nested_elements_indent() {
        assert_eq!(
            html("main {\n  section {\n    p {\n      --text: \"Hi\";\n    }\n  }\n}"),
            "<main>\n    <section>\n        <p>\n            Hi\n        </p>\n    </section>\n</main>"
        );
    }

    #[test]
    fn test_class_chain() {
        assert_eq!(
            html("button.btn.primary {\n}"),
            "<button class=\"btn primary\">\n</button>"
        );
    }

    #[test]
    fn test_css_only_lines_omitted() {
        assert_eq!(
            html("div.card {\n  --id: \"x\";\n  margin: 10px;\n  --text: \"Hi\";\n}"),
            "<div class=\"card\" id=\"x\">\n    Hi\n</div>"
        );
    }

    #[test]
    fn test_rule_blocks_produce_no_markup() {
        assert_eq!(
            html("div {\n  a:hover {\n    color: red;\n  }\n  span {\n  }\n}"),
            "<div>\n    <span>\n    </span>\n</div>"
        );
    }

    #[test]
    fn test_void_element_has_no_close_tag() {
        assert_eq!(
            html("div {\n  img {\n    --src: \"a.png\";\n  }\n  br {\n  }\n}"),
            "<div>\n    <img src=\"a.png\">\n    <br>\n</div>"
        );
    }

    #[test]
    fn test_element_without_block() {
        assert_eq!(html("div {\n  span .x\n}"), "<div>\n    <span></span>\n</div>");
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_attribute_last_wins() {
        assert_eq!(
            html("div { --id: \"a\"; --id: \"b\"; }"),
            "<div id=\"b\">\n</div>"
        );
    }

    #[test]
    fn test_event_attributes_concatenate() {
        assert_eq!(
            html("button {\n  --onclick: \"a();\";\n  --title: \"t\";\n  --onclick: \"b();\";\n}"),
            "<button onclick=\"a(); b();\" title=\"t\">\n</button>"
        );
    }

    #[test]
    fn test_multiline_event_attribute() {
        assert_eq!(
            html("button {\n  --onclick:\n    \"first();\";\n}\n"),
            "<button onclick=\"first();\">\n</button>"
        );
    }

    #[test]
    fn test_quote_in_value_escaped() {
        assert_eq!(
            html(r#"div { --title: "say \"hi\""; }"#),
            "<div title=\"say &quot;hi&quot;\">\n</div>"
        );
    }

    #[test]
    fn test_variables_in_attribute_and_text() {
        assert_eq!(
            html("$name: World;\nh1 {\n  --title: $name;\n  --text: \"Hello $name\";\n}"),
            "<h1 title=\"World\">\n    Hello World\n</h1>"
        );
    }

    #[test]
    fn test_variable_in_class_name() {
        assert_eq!(
            html("$cls: hero;\ndiv.$cls {\n  margin: 0;\n}"),
            "<div class=\"hero\">\n</div>"
        );
    }

    #[test]
    fn test_builtin_in_event_handler() {
        assert_eq!(
            html("button {\n  --onclick: \"$stringifyObject(x)\";\n}"),
            "<button onclick=\"JSON.stringify(x)\">\n</button>"
        );
    }

    // =========================================================================
    // Mixins
    // =========================================================================

    #[test]
    fn test_mixin_expansion_renders() {
        assert_eq!(
            html("@mixin card($t: \"Card\") {\n  h2 {\n    --text: $t;\n  }\n}\nsection {\n  @include card(\"News\");\n}"),
            "<section>\n    <h2>\n        News\n    </h2>\n</section>"
        );
    }

    #[test]
    fn test_parameter_turns_line_into_event_attribute() {
        // `--$ev` is a plain line in the body and only becomes `onclick` once expanded
        assert_eq!(
            html("@mixin m($ev: onclick) {\n  --$ev: \"a();\";\n}\nbutton {\n  --onclick: \"b();\";\n  @include m;\n}"),
            "<button onclick=\"b(); a();\">\n</button>"
        );
    }

    #[test]
    fn test_include_before_definition_renders_nothing() {
        assert_eq!(
            html("section {\n  @include card;\n}\n@mixin card() {\n  h2 {\n  }\n}"),
            "<section>\n</section>"
        );
    }
}
