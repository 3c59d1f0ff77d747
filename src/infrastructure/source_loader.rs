use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File extensions treated as Python source.
pub const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

/// A whole document, read before any parsing begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
}

pub struct SourceLoader {
    exclude: Vec<String>,
}

impl SourceLoader {
    /// `exclude` holds directory names skipped at any depth.
    pub fn new(exclude: Vec<String>) -> Self {
        Self { exclude }
    }

    pub fn is_python_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| PYTHON_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Read the whole of stdin.
    pub fn read_stdin() -> Result<String> {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read source from stdin")?;
        Ok(source)
    }

    pub fn read_file(path: &Path) -> Result<SourceFile> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        Ok(SourceFile {
            path: path.display().to_string(),
            source,
        })
    }

    /// All Python files below `root`, sorted by path. A file `root` is returned as-is.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        if root.is_file() {
            out.push(root.to_path_buf());
            return Ok(out);
        }
        self.collect_recursive(root, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn collect_recursive(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        if self.is_excluded(dir) {
            tracing::debug!(dir = %dir.display(), "skipping excluded directory");
            return Ok(());
        }
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            // symlinked directories are not followed
            if entry.file_type()?.is_dir() {
                self.collect_recursive(&path, out)?;
            } else if Self::is_python_path(&path) {
                out.push(path);
            }
        }
        Ok(())
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.exclude.iter().any(|ex| ex == name))
            .unwrap_or(false)
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new(super::config::ScanConfig::default().exclude)
    }
}
