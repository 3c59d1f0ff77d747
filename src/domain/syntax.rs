// Syntax tree data structures for pysift.
// These types represent parsed Python code in a form suitable for extraction.
// The tree is owned by the parser's output and read-only to everything downstream.

/// 1-indexed location in the source text. `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub position: SourcePosition,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, position: SourcePosition) -> Self {
        Self {
            kind,
            position,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Construct kinds the classifier knows about. Anything else lands in `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Module,
    FunctionDef { name: String, params: Vec<String> },
    ClassDef { name: String },
    For,
    While,
    If,
    Assign { targets: Vec<AssignTarget> },
    Import { modules: Vec<String> },
    /// `module` is `None` for a purely relative `from . import x`.
    ImportFrom { module: Option<String>, names: Vec<String> },
    Other(OtherKind),
}

/// Left-hand side of an assignment, reduced to its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    Name(String),
    Attribute,
    Subscript,
    /// Tuple, list or starred unpacking.
    Unpack,
    Other,
}

impl AssignTarget {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            AssignTarget::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Statement-level constructs that contribute to no category but may hold
/// bodies worth descending into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    AsyncFunctionDef,
    AsyncFor,
    AsyncWith,
    With,
    ElifClause,
    Try,
    ExceptHandler,
    Match,
    MatchCase,
    AugAssign,
    AnnAssign,
    Statement,
}

/// Fieldless mirror of [`NodeKind`], used as the classifier's dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Module,
    FunctionDef,
    ClassDef,
    For,
    While,
    If,
    Assign,
    Import,
    ImportFrom,
    Other,
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Module => NodeTag::Module,
            NodeKind::FunctionDef { .. } => NodeTag::FunctionDef,
            NodeKind::ClassDef { .. } => NodeTag::ClassDef,
            NodeKind::For => NodeTag::For,
            NodeKind::While => NodeTag::While,
            NodeKind::If => NodeTag::If,
            NodeKind::Assign { .. } => NodeTag::Assign,
            NodeKind::Import { .. } => NodeTag::Import,
            NodeKind::ImportFrom { .. } => NodeTag::ImportFrom,
            NodeKind::Other(_) => NodeTag::Other,
        }
    }
}

/// Maps byte offsets into a source text to 1-indexed line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    // Byte offset at which each line starts; always begins with 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    // "\r\n" counts once
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of `offset` in `source`. Offsets past the end clamp to the end;
    /// offsets inside a multi-byte character snap back to its start.
    pub fn position(&self, source: &str, offset: usize) -> SourcePosition {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = source[line_start..offset].chars().count() + 1;
        SourcePosition::new(line_idx + 1, column)
    }
}
