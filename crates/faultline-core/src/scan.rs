//! Lightweight structural scanning of changed source files.
//!
//! `apply_commit` re-analyzes only touched paths, so the scanner has to be
//! cheap and tolerant: a per-language line scan extracting imports,
//! top-level function definitions, and call sites. It is not a parser; it
//! exists to keep the dependency graph's structural edges current, and it
//! degrades gracefully (a file it cannot analyze keeps its prior subtree,
//! marked degraded).

use indexmap::IndexSet;
use regex::Regex;
use thiserror::Error;

use crate::node::LanguageTag;

/// The structural facts extracted from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOutline {
    /// Imported module/path strings, in file order, deduplicated.
    pub imports: Vec<String>,
    /// Top-level function names, in file order, deduplicated.
    pub functions: Vec<String>,
    /// Called identifier names, deduplicated.
    pub calls: Vec<String>,
}

/// Structural analysis failed for a file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The content is not analyzable text (embedded NUL bytes).
    #[error("binary content cannot be structurally analyzed")]
    BinaryContent,
}

/// Per-language line scanner with pre-compiled patterns.
pub struct SourceScanner {
    py_import: Regex,
    py_def: Regex,
    rs_use: Regex,
    rs_fn: Regex,
    js_import: Regex,
    js_fn: Regex,
    js_arrow: Regex,
    go_import: Regex,
    go_func: Regex,
    call_site: Regex,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceScanner {
    /// Compiles the pattern tables. Patterns are constants; compilation
    /// cannot fail at runtime.
    pub fn new() -> Self {
        SourceScanner {
            py_import: Regex::new(r"^\s*(?:from\s+([\w.]+)\s+import|import\s+([\w.]+))")
                .expect("invalid py_import pattern"),
            py_def: Regex::new(r"^\s*(?:async\s+)?def\s+(\w+)")
                .expect("invalid py_def pattern"),
            rs_use: Regex::new(r"^\s*(?:pub\s+)?use\s+([\w:]+)")
                .expect("invalid rs_use pattern"),
            rs_fn: Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+(\w+)")
                .expect("invalid rs_fn pattern"),
            js_import: Regex::new(
                r#"^\s*import\s+.*?from\s+['"]([^'"]+)['"]|require\(\s*['"]([^'"]+)['"]\s*\)"#,
            )
            .expect("invalid js_import pattern"),
            js_fn: Regex::new(r"^\s*(?:export\s+)?(?:async\s+)?function\s+(\w+)")
                .expect("invalid js_fn pattern"),
            js_arrow: Regex::new(
                r"^\s*(?:export\s+)?(?:const|let)\s+(\w+)\s*=\s*(?:async\s*)?\(",
            )
            .expect("invalid js_arrow pattern"),
            go_import: Regex::new(r#"^\s*(?:import\s+)?"([\w./-]+)"$"#)
                .expect("invalid go_import pattern"),
            go_func: Regex::new(r"^func\s+(?:\([^)]*\)\s*)?(\w+)")
                .expect("invalid go_func pattern"),
            call_site: Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(")
                .expect("invalid call_site pattern"),
        }
    }

    /// Scans `content` according to `language`.
    ///
    /// Unknown languages produce an empty outline (the file is tracked at
    /// file granularity only). Binary content is a [`ScanError`]; the
    /// caller retains the file's prior subtree and marks it degraded.
    pub fn scan(
        &self,
        language: LanguageTag,
        content: &str,
    ) -> Result<FileOutline, ScanError> {
        if content.contains('\0') {
            return Err(ScanError::BinaryContent);
        }

        let mut imports: IndexSet<String> = IndexSet::new();
        let mut functions: IndexSet<String> = IndexSet::new();
        let mut calls: IndexSet<String> = IndexSet::new();

        for line in content.lines() {
            match language {
                LanguageTag::Python => {
                    if let Some(caps) = self.py_import.captures(line) {
                        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                            imports.insert(m.as_str().to_string());
                        }
                    }
                    if let Some(caps) = self.py_def.captures(line) {
                        functions.insert(caps[1].to_string());
                        continue;
                    }
                }
                LanguageTag::Rust => {
                    if let Some(caps) = self.rs_use.captures(line) {
                        imports.insert(caps[1].to_string());
                    }
                    if let Some(caps) = self.rs_fn.captures(line) {
                        functions.insert(caps[1].to_string());
                        continue;
                    }
                }
                LanguageTag::JavaScript | LanguageTag::TypeScript => {
                    if let Some(caps) = self.js_import.captures(line) {
                        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                            imports.insert(m.as_str().to_string());
                        }
                    }
                    if let Some(caps) = self.js_fn.captures(line) {
                        functions.insert(caps[1].to_string());
                        continue;
                    }
                    if let Some(caps) = self.js_arrow.captures(line) {
                        functions.insert(caps[1].to_string());
                        continue;
                    }
                }
                LanguageTag::Go => {
                    if let Some(caps) = self.go_import.captures(line) {
                        imports.insert(caps[1].to_string());
                    }
                    if let Some(caps) = self.go_func.captures(line) {
                        functions.insert(caps[1].to_string());
                        continue;
                    }
                }
                LanguageTag::Unknown => continue,
            }

            // Call sites on non-definition lines.
            for caps in self.call_site.captures_iter(line) {
                let name = &caps[1];
                if !matches!(
                    name,
                    "if" | "for" | "while" | "match" | "switch" | "return" | "fn"
                        | "def" | "func" | "function" | "use" | "import"
                ) {
                    calls.insert(name.to_string());
                }
            }
        }

        Ok(FileOutline {
            imports: imports.into_iter().collect(),
            functions: functions.into_iter().collect(),
            calls: calls.into_iter().collect(),
        })
    }
}
