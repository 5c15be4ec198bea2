//! Content classifier.
//!
//! Decides, once per statement, whether it is an HTML element opener, a
//! known HTML attribute, or a generic line. Attribute lines only ever reach
//! the HTML output; generic lines are the only ones the CSS output sees.

use crate::vocab;

/// The innermost open block a statement is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Top level of the file.
    Root,
    /// Inside an element opened with this tag.
    Element(&'a str),
    /// Inside a `@mixin` body; the real parent is only known at expansion.
    Mixin,
    /// Inside a non-element block such as `@media (...) {` or `a:hover {`.
    Block,
}

/// Result of classifying one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Element {
        tag: String,
        class: Option<String>,
    },
    Attribute {
        name: String,
        value: String,
        is_event: bool,
    },
    Generic,
}

/// Marker for literal text content inside an element.
pub const TEXT_MARKER: &str = "--text";

/// Classify a statement against the scope it appears in.
pub fn classify(text: &str, scope: Scope<'_>) -> Classification {
    if let Some(element) = classify_element(text) {
        return element;
    }
    if is_text_marker(text) {
        return Classification::Generic;
    }
    classify_attribute(text, scope).unwrap_or(Classification::Generic)
}

/// `tag`, `tag {`, `tag.class {`, `tag.a.b {` where `tag` is a known tag name.
fn classify_element(text: &str) -> Option<Classification> {
    let tag_len = text
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(text.len());
    let (tag, rest) = text.split_at(tag_len);
    if tag.is_empty() || !vocab::is_tag_name(tag) {
        return None;
    }

    let delimiter = rest.chars().next()?;
    if !(delimiter == '.' || delimiter == '{' || delimiter.is_whitespace()) {
        return None;
    }

    let class = rest.strip_prefix('.').and_then(|classes| {
        let end = classes
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(classes.len());
        let names: Vec<&str> = classes[..end].split('.').filter(|s| !s.is_empty()).collect();
        (!names.is_empty()).then(|| names.join(" "))
    });

    Some(Classification::Element {
        tag: tag.to_string(),
        class,
    })
}

/// `--name: value;` where `name` is an attribute allowed in `scope`.
fn classify_attribute(text: &str, scope: Scope<'_>) -> Option<Classification> {
    let after_prefix = text.strip_prefix("--")?;
    let name_len = after_prefix
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_prefix.len());
    let name = &after_prefix[..name_len];
    let value_part = after_prefix[name_len..].trim_start().strip_prefix(':')?;

    if name.is_empty() || !is_attribute_in_scope(name, scope) {
        return None;
    }

    Some(Classification::Attribute {
        name: name.to_string(),
        value: unescape_value(extract_value(value_part)),
        is_event: vocab::is_event_attribute(name),
    })
}

fn is_attribute_in_scope(name: &str, scope: Scope<'_>) -> bool {
    if vocab::is_global_attribute(name) {
        return true;
    }
    match scope {
        Scope::Root | Scope::Mixin => vocab::is_any_element_attribute(name),
        Scope::Element(tag) => vocab::element_attributes(tag).contains(&name),
        Scope::Block => false,
    }
}

/// Whether the statement is a `--text: "...";` marker.
pub fn is_text_marker(text: &str) -> bool {
    text.strip_prefix(TEXT_MARKER)
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// Literal text carried by a `--text:` marker.
pub fn text_content(text: &str) -> Option<String> {
    if !is_text_marker(text) {
        return None;
    }
    let (_, value) = text.split_once(':')?;
    Some(unescape_value(extract_value(value)))
}

/// The value part of a declaration: everything up to the last `;` outside
/// double quotes, trimmed.
///
/// A piece of a multi-line value that closes a quote it never opened
/// (`last line";`) still has its trailing `;` removed.
pub fn extract_value(after_colon: &str) -> &str {
    let mut in_quote = false;
    let mut escaped = false;
    let mut end = None;
    for (i, ch) in after_colon.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            ';' if !in_quote => end = Some(i),
            _ => {}
        }
    }
    if in_quote {
        end = after_colon
            .trim_end()
            .strip_suffix("\";")
            .map(|rest| rest.len() + 1);
    }

    match end {
        Some(end) => after_colon[..end].trim(),
        None => after_colon.trim(),
    }
}

/// Strip surrounding double quotes and resolve JSON-style escapes.
///
/// The quotes are stripped independently so the fragments of a multi-line
/// value (`"first line`, `last line"`) unescape the same way as a whole one.
pub fn unescape_value(value: &str) -> String {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let mut hex = String::new();
                while hex.len() < 4 {
                    match chars.next_if(|c| c.is_ascii_hexdigit()) {
                        Some(digit) => hex.push(digit),
                        None => break,
                    }
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attr(name: &str, value: &str, is_event: bool) -> Classification {
        Classification::Attribute {
            name: name.into(),
            value: value.into(),
            is_event,
        }
    }

    // =========================================================================
    // Elements
    // =========================================================================

    #[test]
    fn test_element_with_brace() {
        assert_eq!(
            classify("div {", Scope::Root),
            Classification::Element {
                tag: "div".into(),
                class: None
            }
        );
    }

    #[test]
    fn test_element_with_class() {
        assert_eq!(
            classify("div.card {", Scope::Root),
            Classification::Element {
                tag: "div".into(),
                class: Some("card".into())
            }
        );
    }

    #[test]
    fn test_element_with_class_no_space() {
        assert_eq!(
            classify("section.hero{", Scope::Root),
            Classification::Element {
                tag: "section".into(),
                class: Some("hero".into())
            }
        );
    }

    #[test]
    fn test_element_with_class_chain() {
        assert_eq!(
            classify("button.btn.primary {", Scope::Root),
            Classification::Element {
                tag: "button".into(),
                class: Some("btn primary".into())
            }
        );
    }

    #[test]
    fn test_prefix_of_longer_tag_is_not_matched() {
        // `b` is a tag but `blockquote` must win, and `bx` is nothing
        assert_eq!(
            classify("blockquote {", Scope::Root),
            Classification::Element {
                tag: "blockquote".into(),
                class: None
            }
        );
        assert_eq!(classify("bx {", Scope::Root), Classification::Generic);
    }

    #[test]
    fn test_pseudo_selector_is_generic() {
        assert_eq!(classify("a:hover {", Scope::Root), Classification::Generic);
    }

    #[test]
    fn test_unknown_tag_is_generic() {
        assert_eq!(classify(".card {", Scope::Root), Classification::Generic);
        assert_eq!(classify("card {", Scope::Root), Classification::Generic);
    }

    #[test]
    fn test_css_property_named_like_tag_is_generic() {
        assert_eq!(classify("content: \"x\";", Scope::Root), Classification::Generic);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_global_attribute() {
        assert_eq!(
            classify("--id: \"main\";", Scope::Element("div")),
            attr("id", "main", false)
        );
    }

    #[test]
    fn test_bare_value() {
        assert_eq!(
            classify("--tabindex: 0;", Scope::Element("div")),
            attr("tabindex", "0", false)
        );
    }

    #[test]
    fn test_event_attribute() {
        assert_eq!(
            classify("--onclick: \"go(); stop();\";", Scope::Element("button")),
            attr("onclick", "go(); stop();", true)
        );
    }

    #[test]
    fn test_aria_attribute() {
        assert_eq!(
            classify("--aria-label: \"Close\";", Scope::Element("button")),
            attr("aria-label", "Close", false)
        );
    }

    #[test]
    fn test_element_scoped_attribute() {
        assert_eq!(
            classify("--href: \"/about\";", Scope::Element("a")),
            attr("href", "/about", false)
        );
        assert_eq!(
            classify("--href: \"/about\";", Scope::Element("div")),
            Classification::Generic
        );
    }

    #[test]
    fn test_root_and_mixin_scope_allow_any_element_attribute() {
        assert_eq!(
            classify("--href: x;", Scope::Root),
            attr("href", "x", false)
        );
        assert_eq!(
            classify("--placeholder: x;", Scope::Mixin),
            attr("placeholder", "x", false)
        );
    }

    #[test]
    fn test_rule_block_scope_allows_only_global() {
        assert_eq!(classify("--href: x;", Scope::Block), Classification::Generic);
        assert_eq!(classify("--id: x;", Scope::Block), attr("id", "x", false));
    }

    #[test]
    fn test_custom_property_is_generic() {
        assert_eq!(
            classify("--brand-color: #333;", Scope::Element("div")),
            Classification::Generic
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(
            classify("--onclick:", Scope::Element("button")),
            attr("onclick", "", true)
        );
    }

    #[test]
    fn test_escaped_quotes_unescaped() {
        assert_eq!(
            classify(r#"--title: "say \"hi\" \\ bye";"#, Scope::Element("div")),
            attr("title", r#"say "hi" \ bye"#, false)
        );
    }

    // =========================================================================
    // Text markers and value helpers
    // =========================================================================

    #[test]
    fn test_text_marker_is_generic_even_in_body() {
        assert!(is_text_marker("--text: \"Hi\";"));
        assert_eq!(
            classify("--text: \"Hi\";", Scope::Element("body")),
            Classification::Generic
        );
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("--text: \"Hello, world\";"), Some("Hello, world".into()));
        assert_eq!(text_content("--text: plain words;"), Some("plain words".into()));
        assert_eq!(text_content("color: red;"), None);
    }

    #[test]
    fn test_extract_value_uses_last_semicolon() {
        assert_eq!(extract_value(" \"a(); b();\";"), "\"a(); b();\"");
        assert_eq!(extract_value(" 10px"), "10px");
    }

    #[test]
    fn test_extract_value_keeps_quoted_semicolon() {
        assert_eq!(extract_value(" \"a;b\""), "\"a;b\"");
        assert_eq!(extract_value(r#" "x\";y";"#), r#""x\";y""#);
        assert_eq!(
            classify("--title: \"a;b\"", Scope::Element("div")),
            attr("title", "a;b", false)
        );
    }

    #[test]
    fn test_extract_value_of_multiline_pieces() {
        assert_eq!(extract_value(" \"first line"), "\"first line");
        assert_eq!(extract_value(" last; line\";"), "last; line\"");
        assert_eq!(extract_value(" middle;"), "middle");
    }

    #[test]
    fn test_unescape_fragments() {
        assert_eq!(unescape_value("\"first half"), "first half");
        assert_eq!(unescape_value("second half\""), "second half");
        assert_eq!(unescape_value("\"\\u0041\\n\""), "A\n");
    }
}
