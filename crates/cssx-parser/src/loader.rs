//! Where `@import` reads its files from.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Source of imported files.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads imports from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves imports from an in-memory map of path to source text.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(normalize(&path.into()), source.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files.get(&normalize(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

/// Lexically drop `.` segments and resolve `..` so `./a/../b.cssx` and
/// `b.cssx` name the same entry.
pub fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader_roundtrip() {
        let loader = MemoryLoader::new().with_file("styles/base.cssx", "color: red;");
        assert_eq!(
            loader.load(Path::new("styles/base.cssx")).unwrap(),
            "color: red;"
        );
    }

    #[test]
    fn test_memory_loader_normalizes_paths() {
        let loader = MemoryLoader::new().with_file("./styles/base.cssx", "x");
        assert!(loader.load(Path::new("styles/../styles/base.cssx")).is_ok());
    }

    #[test]
    fn test_memory_loader_missing_file() {
        let err = MemoryLoader::new().load(Path::new("nope.cssx")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./a/b/../c.cssx")), PathBuf::from("a/c.cssx"));
        assert_eq!(normalize(Path::new("../x.cssx")), PathBuf::from("../x.cssx"));
    }
}
