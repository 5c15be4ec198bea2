//! Static site build: one page per route file.
//!
//! Each `*.cssx` in the route directory is compiled with its own directory
//! as the import base, and both outputs are injected into the page template.

use std::io;
use std::path::{Path, PathBuf};

use cssx_codegen::{CompileError, CompileOptions};
use tracing::{debug, info};

use crate::config::ProjectConfig;

pub const APP_PLACEHOLDER: &str = "<div id=\"app\"></div>";
pub const STYLE_PLACEHOLDER: &str = "<style id=\"stylesheet\"></style>";

/// Page used when the project has no template file.
pub const DEFAULT_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
  <meta charset=\"UTF-8\">
  <style id=\"stylesheet\"></style>
</head>
<body>
  <div id=\"app\"></div>
</body>
</html>
";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: {source}", .path.display())]
    Compile { path: PathBuf, source: CompileError },

    #[error("template {} has no `{placeholder}`", .path.display())]
    Template {
        path: PathBuf,
        placeholder: &'static str,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Build every route under `root` and return the written pages.
pub fn build_project(
    root: &Path,
    config: &ProjectConfig,
    options: &CompileOptions,
) -> Result<Vec<PathBuf>, BuildError> {
    let template = load_template(&root.join(&config.template))?;
    let out_dir = root.join(&config.output_dir);
    std::fs::create_dir_all(&out_dir).map_err(io_error(&out_dir))?;

    let mut written = Vec::new();
    for route in route_files(&root.join(&config.route_dir))? {
        let source = std::fs::read_to_string(&route).map_err(io_error(&route))?;
        let base_dir = route.parent().unwrap_or(Path::new("."));
        let output = cssx_codegen::compile(&source, base_dir, options).map_err(|source| {
            BuildError::Compile {
                path: route.clone(),
                source,
            }
        })?;

        let page = inject(&template, &output.html, &output.css);
        let stem = route
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let page_path = out_dir.join(format!("{stem}.html"));
        std::fs::write(&page_path, &page).map_err(io_error(&page_path))?;
        debug!(route = %route.display(), page = %page_path.display(), "route built");
        written.push(page_path);

        if stem == config.default_route_name() {
            let index = out_dir.join("index.html");
            std::fs::write(&index, &page).map_err(io_error(&index))?;
            written.push(index);
        }
    }

    if let Some(assets) = &config.assets_dir {
        let from = root.join(assets);
        let name = from.file_name().map(PathBuf::from).unwrap_or_default();
        let copied = copy_dir(&from, &out_dir.join(name))?;
        info!(files = copied, from = %from.display(), "assets copied");
    }

    Ok(written)
}

/// Put the HTML inside the app container and the CSS inside the stylesheet.
pub fn inject(template: &str, html: &str, css: &str) -> String {
    template
        .replacen(
            APP_PLACEHOLDER,
            &format!("<div id=\"app\">\n{html}\n</div>"),
            1,
        )
        .replacen(
            STYLE_PLACEHOLDER,
            &format!("<style id=\"stylesheet\">\n{css}\n</style>"),
            1,
        )
}

fn load_template(path: &Path) -> Result<String, BuildError> {
    let template = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no template, using the built-in page");
            return Ok(DEFAULT_TEMPLATE.to_string());
        }
        Err(source) => return Err(io_error(path)(source)),
    };

    for placeholder in [APP_PLACEHOLDER, STYLE_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(BuildError::Template {
                path: path.to_path_buf(),
                placeholder,
            });
        }
    }
    Ok(template)
}

/// `*.cssx` files directly inside `dir`, sorted by name.
fn route_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut routes = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "cssx") {
            routes.push(path);
        }
    }
    routes.sort();
    Ok(routes)
}

fn copy_dir(from: &Path, to: &Path) -> Result<usize, BuildError> {
    std::fs::create_dir_all(to).map_err(io_error(to))?;
    let mut copied = 0;
    for entry in std::fs::read_dir(from).map_err(io_error(from))? {
        let path = entry.map_err(io_error(from))?.path();
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = to.join(name);
        if path.is_dir() {
            copied += copy_dir(&path, &target)?;
        } else {
            std::fs::copy(&path, &target).map_err(io_error(&path))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(path: &Path, text: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }

    // =========================================================================
    // Injection
    // =========================================================================

    #[test]
    fn test_inject() {
        let page = inject(DEFAULT_TEMPLATE, "<p>\n</p>", "p {\n}");
        assert!(page.contains("<div id=\"app\">\n<p>\n</p>\n</div>"));
        assert!(page.contains("<style id=\"stylesheet\">\np {\n}\n</style>"));
    }

    #[test]
    fn test_template_without_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        write(&path, "<html><div id=\"app\"></div></html>");
        assert!(matches!(
            load_template(&path),
            Err(BuildError::Template {
                placeholder: STYLE_PLACEHOLDER,
                ..
            })
        ));
    }

    // =========================================================================
    // Project build
    // =========================================================================

    #[test]
    fn test_build_routes_with_imports_and_assets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("routes/home.cssx"),
            "@import 'parts/theme.cssx';\nmain {\n  --text: \"Home\";\n  color: $fg;\n}",
        );
        write(&root.join("routes/parts/theme.cssx"), "$fg: #111;");
        write(&root.join("routes/about.cssx"), "p {\n}");
        write(&root.join("static/logo.svg"), "<svg/>");

        let config = ProjectConfig {
            assets_dir: Some(PathBuf::from("static")),
            ..ProjectConfig::default()
        };
        let written = build_project(root, &config, &CompileOptions::default()).unwrap();

        let dist = root.join("dist");
        assert_eq!(
            written,
            vec![
                dist.join("about.html"),
                dist.join("home.html"),
                dist.join("index.html")
            ]
        );
        let home = fs::read_to_string(dist.join("home.html")).unwrap();
        assert!(home.contains("<div id=\"app\">\n<main>\n    Home\n</main>\n</div>"));
        assert!(home.contains("main {\n    color: #111;\n}"));
        assert!(dist.join("static/logo.svg").is_file());
    }

    #[test]
    fn test_compile_error_names_route() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("routes/broken.cssx"), "div {\n");
        let err = build_project(dir.path(), &ProjectConfig::default(), &CompileOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("broken.cssx"));
        assert!(err.to_string().contains("unbalanced braces"));
    }
}
