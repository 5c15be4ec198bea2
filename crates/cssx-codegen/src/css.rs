//! CSS code generator.
//!
//! Emits every declaration and rule line of the document forest. Attribute
//! nodes, `--text` content and suppressed lines (mixins, includes,
//! variable declarations) never reach the stylesheet.

use cssx_parser::classify::is_text_marker;
use cssx_parser::{Document, NodeId};

use crate::variables::Resolver;
use crate::{CodegenError, INDENT};

/// Generate the stylesheet for a document.
pub fn generate(doc: &Document, resolver: &Resolver<'_>) -> Result<String, CodegenError> {
    let mut lines = Vec::new();
    for &root in doc.roots() {
        emit(doc, resolver, root, 0, &mut lines)?;
    }
    Ok(lines.join("\n"))
}

fn emit(
    doc: &Document,
    resolver: &Resolver<'_>,
    id: NodeId,
    depth: usize,
    lines: &mut Vec<String>,
) -> Result<(), CodegenError> {
    let node = doc.get(id);
    if node.suppressed || node.is_attribute() || is_text_marker(&node.raw) {
        return Ok(());
    }

    if node.is_block_close() {
        let level = depth.checked_sub(1).ok_or_else(|| CodegenError {
            message: format!("closing brace at line {} has no open block", node.line),
        })?;
        lines.push(format!("{}}}", INDENT.repeat(level)));
    } else {
        lines.push(format!("{}{}", INDENT.repeat(depth), resolver.apply(&node.raw)));
    }

    for &child in &node.children {
        emit(doc, resolver, child, depth + 1, lines)?;
    }
    Ok(())
}
