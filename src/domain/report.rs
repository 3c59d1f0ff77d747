//! Extraction Report Module
//!
//! The categorized facts collected from one syntax tree, and the builder
//! that accumulates them during a single traversal.

use serde::{Deserialize, Deserializer, Serialize};

/// A function declaration with its positional parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(rename = "lineno")]
    pub line: usize,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    #[serde(rename = "lineno")]
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopKind {
    For,
    While,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopEntry {
    #[serde(rename = "type")]
    pub kind: LoopKind,
    #[serde(rename = "lineno")]
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEntry {
    #[serde(rename = "lineno")]
    pub line: usize,
}

/// An assignment statement; only simple-name targets are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub targets: Vec<String>,
    #[serde(rename = "lineno")]
    pub line: usize,
}

/// `import a, b` or `from m import a, b`.
///
/// `from_module` is `None` for a plain import, which omits the `from` key.
/// An import-from always carries the key; its value is `null` when the
/// statement names no module (`from . import a`). Leading dots are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub modules: Vec<String>,
    #[serde(
        rename = "from",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_key"
    )]
    pub from_module: Option<Option<String>>,
    #[serde(rename = "lineno")]
    pub line: usize,
}

// A `from` key that is present, even as `null`, marks an import-from.
fn present_key<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Output categories. `Comments` mirrors `Functions` (kept for output compatibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Functions,
    Classes,
    Loops,
    Conditionals,
    Assignments,
    Imports,
    Comments,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Functions,
        Category::Classes,
        Category::Loops,
        Category::Conditionals,
        Category::Assignments,
        Category::Imports,
        Category::Comments,
    ];

    /// Key used for this category in the serialized report.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Functions => "functions",
            Category::Classes => "classes",
            Category::Loops => "loops",
            Category::Conditionals => "conditionals",
            Category::Assignments => "assignments",
            Category::Imports => "imports",
            Category::Comments => "comments",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One classified fact, before it is filed under a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Function(FunctionEntry),
    Class(ClassEntry),
    Loop(LoopEntry),
    Conditional(ConditionalEntry),
    Assignment(AssignmentEntry),
    Import(ImportEntry),
}

/// The final analysis output. Each sequence is in tree-visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub functions: Vec<FunctionEntry>,
    pub classes: Vec<ClassEntry>,
    pub loops: Vec<LoopEntry>,
    pub conditionals: Vec<ConditionalEntry>,
    pub assignments: Vec<AssignmentEntry>,
    pub imports: Vec<ImportEntry>,
    pub comments: Vec<FunctionEntry>,
}

impl ExtractionReport {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Functions => self.functions.len(),
            Category::Classes => self.classes.len(),
            Category::Loops => self.loops.len(),
            Category::Conditionals => self.conditionals.len(),
            Category::Assignments => self.assignments.len(),
            Category::Imports => self.imports.len(),
            Category::Comments => self.comments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.count(*c) == 0)
    }
}

/// Accumulates entries for one traversal, then freezes into an [`ExtractionReport`].
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: ExtractionReport,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `entry` under `category`. Returns false (and drops the entry) when
    /// the entry's shape does not belong in that category.
    pub fn push(&mut self, category: Category, entry: Entry) -> bool {
        let report = &mut self.report;
        match (category, entry) {
            (Category::Functions, Entry::Function(e)) => report.functions.push(e),
            (Category::Comments, Entry::Function(e)) => report.comments.push(e),
            (Category::Classes, Entry::Class(e)) => report.classes.push(e),
            (Category::Loops, Entry::Loop(e)) => report.loops.push(e),
            (Category::Conditionals, Entry::Conditional(e)) => report.conditionals.push(e),
            (Category::Assignments, Entry::Assignment(e)) => report.assignments.push(e),
            (Category::Imports, Entry::Import(e)) => report.imports.push(e),
            (category, entry) => {
                tracing::debug!(%category, ?entry, "entry does not fit category, dropped");
                return false;
            }
        }
        true
    }

    pub fn finish(self) -> ExtractionReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_files_entries_by_category() {
        let mut builder = ReportBuilder::new();
        let f = FunctionEntry { name: "f".into(), line: 1, args: vec![] };
        assert!(builder.push(Category::Functions, Entry::Function(f.clone())));
        assert!(builder.push(Category::Comments, Entry::Function(f.clone())));
        assert!(builder.push(
            Category::Loops,
            Entry::Loop(LoopEntry { kind: LoopKind::While, line: 3 })
        ));
        let report = builder.finish();
        assert_eq!(report.functions, vec![f.clone()]);
        assert_eq!(report.comments, vec![f]);
        assert_eq!(report.count(Category::Loops), 1);
        assert_eq!(report.count(Category::Classes), 0);
    }

    #[test]
    fn test_builder_rejects_mismatched_entry() {
        let mut builder = ReportBuilder::new();
        let pushed = builder.push(
            Category::Classes,
            Entry::Conditional(ConditionalEntry { line: 1 }),
        );
        assert!(!pushed);
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_report_serializes_wire_field_names() {
        let report = ExtractionReport {
            loops: vec![LoopEntry { kind: LoopKind::For, line: 2 }],
            imports: vec![
                ImportEntry { modules: vec!["os".into()], from_module: None, line: 1 },
                ImportEntry {
                    modules: vec!["path".into()],
                    from_module: Some(Some("os".into())),
                    line: 2,
                },
                ImportEntry { modules: vec!["a".into()], from_module: Some(None), line: 3 },
            ],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["loops"][0], serde_json::json!({"type": "for", "lineno": 2}));
        assert_eq!(json["imports"][0], serde_json::json!({"modules": ["os"], "lineno": 1}));
        assert_eq!(
            json["imports"][1],
            serde_json::json!({"modules": ["path"], "from": "os", "lineno": 2})
        );
        assert_eq!(
            json["imports"][2],
            serde_json::json!({"modules": ["a"], "from": null, "lineno": 3})
        );
        let back: ExtractionReport = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, report);
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for category in Category::ALL {
            assert!(keys.contains(&category.key()), "missing {}", category);
        }
    }
}
