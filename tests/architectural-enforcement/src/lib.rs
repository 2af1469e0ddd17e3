//! Architectural Enforcement
//!
//! Source scanners backing the integration tests in `tests/`. They walk the
//! production sources of every slider crate and report lines that break a
//! workspace rule:
//! - No sleeping outside the dismiss timer
//! - No panicking shortcuts (`unwrap`, `expect`) in library or daemon code
//! - No blocking file I/O outside configuration loading
//!
//! Everything from the first `#[cfg(test)]` line of a file onwards counts as
//! test code and is skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["slider/core/src", "slider/daemon/src"];

/// Workspace root, derived from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Production lines of one source file
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// `(line number, code)` pairs with line comments removed
    pub lines: Vec<(usize, String)>,
}

impl SourceFile {
    /// Read a file and keep only its production code
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(root: &Path, path: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let lines = content
            .lines()
            .enumerate()
            .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
            .map(|(idx, line)| (idx + 1, strip_comment(line).to_string()))
            .filter(|(_, code)| !code.trim().is_empty())
            .collect();

        Ok(Self {
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            lines,
        })
    }

    /// Whether this file's path ends with the given suffix
    #[must_use]
    pub fn is(&self, suffix: &str) -> bool {
        self.path.ends_with(suffix)
    }
}

fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Every production `.rs` file under [`PRODUCTION_DIRS`]
#[must_use]
pub fn production_sources() -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files = Vec::new();

    for dir in PRODUCTION_DIRS {
        for entry in walkdir::WalkDir::new(root.join(dir))
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            if let Ok(file) = SourceFile::load(&root, entry.path()) {
                files.push(file);
            }
        }
    }

    files
}

/// One offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File, relative to the workspace root
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending code
    pub code: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.code.trim())
    }
}

/// Lines in `files` containing any of `patterns`, skipping files for which
/// `allowed` returns true
pub fn find_violations(
    files: &[SourceFile],
    patterns: &[&str],
    allowed: impl Fn(&SourceFile) -> bool,
) -> Vec<Violation> {
    files
        .iter()
        .filter(|file| !allowed(file))
        .flat_map(|file| {
            file.lines
                .iter()
                .filter(|(_, code)| patterns.iter().any(|p| code.contains(p)))
                .map(|(line, code)| Violation {
                    path: file.path.clone(),
                    line: *line,
                    code: code.clone(),
                })
        })
        .collect()
}

/// Panic with a readable report if there are violations
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s) of: {rule}", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("let x = 1; // note"), "let x = 1; ");
        assert_eq!(strip_comment("/// docs"), "");
    }

    #[test]
    fn test_production_sources_found() {
        let files = production_sources();
        assert!(files.iter().any(|f| f.is("slider/core/src/controller.rs")));
        assert!(files.iter().any(|f| f.is("slider/daemon/src/main.rs")));
    }

    #[test]
    fn test_find_violations_reports_lines() {
        let file = SourceFile {
            path: PathBuf::from("a.rs"),
            lines: vec![(3, "x.unwrap()".to_string()), (4, "y?".to_string())],
        };
        let found = find_violations(&[file], &[".unwrap()"], |_| false);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
        assert_eq!(found[0].to_string(), "a.rs:3 - x.unwrap()");
    }
}
