//! WASM bindings for the CSSX compiler.
//!
//! Exposes `parseHtml()`, `parseCss()` and `compile()` to JavaScript via
//! wasm-bindgen. There is no filesystem in the browser, so `@import` reads
//! from an optional `{ path: source }` object passed as the last argument.

use std::collections::HashMap;
use std::path::Path;

use cssx_codegen::{CompileError, CompileOptions, CompilerOutput};
use cssx_parser::MemoryLoader;
use wasm_bindgen::prelude::*;

/// Compile CSSX source to an HTML fragment.
///
/// Throws a JS error if parsing or code generation fails.
#[wasm_bindgen(js_name = parseHtml)]
pub fn parse_html(source: &str, files: JsValue) -> Result<String, JsError> {
    let loader = loader_from(files)?;
    cssx_codegen::parse_html_with(source, Path::new(""), &loader, &CompileOptions::default())
        .map_err(to_js_error)
}

/// Compile CSSX source to a stylesheet.
#[wasm_bindgen(js_name = parseCss)]
pub fn parse_css(source: &str, files: JsValue) -> Result<String, JsError> {
    let loader = loader_from(files)?;
    cssx_codegen::parse_css_with(source, Path::new(""), &loader, &CompileOptions::default())
        .map_err(to_js_error)
}

/// Compile CSSX source to both outputs.
///
/// Returns a JS object with `{ html: string, css: string }`.
#[wasm_bindgen]
pub fn compile(source: &str, files: JsValue) -> Result<JsValue, JsError> {
    let loader = loader_from(files)?;
    let output = compile_native(source, &loader).map_err(to_js_error)?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"html".into(), &output.html.into())
        .map_err(|_| JsError::new("Failed to set html property"))?;
    js_sys::Reflect::set(&js_obj, &"css".into(), &output.css.into())
        .map_err(|_| JsError::new("Failed to set css property"))?;

    Ok(js_obj.into())
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn loader_from(files: JsValue) -> Result<MemoryLoader, JsError> {
    if files.is_undefined() || files.is_null() {
        return Ok(MemoryLoader::new());
    }
    let files: HashMap<String, String> = serde_wasm_bindgen::from_value(files)
        .map_err(|e| JsError::new(&format!("files must map paths to source text: {e}")))?;
    Ok(memory_loader(files))
}

fn memory_loader(files: HashMap<String, String>) -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    for (path, source) in files {
        loader.insert(path, source);
    }
    loader
}

fn compile_native(source: &str, loader: &MemoryLoader) -> Result<CompilerOutput, CompileError> {
    cssx_codegen::compile_with(source, Path::new(""), loader, &CompileOptions::default())
}

fn to_js_error(e: CompileError) -> JsError {
    JsError::new(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM): the pipeline behind the exports
    // =========================================================================

    fn native_compile(source: &str, files: &[(&str, &str)]) -> CompilerOutput {
        let files = files
            .iter()
            .map(|(path, text)| (path.to_string(), text.to_string()))
            .collect();
        compile_native(source, &memory_loader(files)).unwrap()
    }

    #[test]
    fn test_empty_document() {
        let output = native_compile("", &[]);
        assert_eq!(output.html, "");
        assert_eq!(output.css, "");
    }

    #[test]
    fn test_card() {
        let output = native_compile("div.card {\n  --text: \"Hello\";\n  padding: 1rem;\n}", &[]);
        assert_eq!(output.html, "<div class=\"card\">\n    Hello\n</div>");
        assert_eq!(output.css, "div.card {\n    padding: 1rem;\n}");
    }

    #[test]
    fn test_import_from_files_map() {
        let output = native_compile(
            "@import 'theme/colors.cssx';\nbody {\n  color: $fg;\n}",
            &[("theme/colors.cssx", "$fg: #222;")],
        );
        assert_eq!(output.css, "body {\n    color: #222;\n}");
    }

    #[test]
    fn test_missing_import_is_an_error() {
        let err = compile_native("@import 'x.cssx';", &MemoryLoader::new()).unwrap_err();
        assert!(err.to_string().contains("cannot import 'x.cssx'"));
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_compiles() {
        // No state leaks between compiles
        let first = native_compile("@mixin m() {\n  color: red;\n}\np {\n  @include m;\n}", &[]);
        let second = native_compile("p {\n  @include m;\n}", &[]);
        assert!(first.css.contains("color: red;"));
        assert_eq!(second.css, "p {\n}");
    }
}
