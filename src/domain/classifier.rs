//! Node Classifier Module
//!
//! Decides which categories a syntax node contributes to. Dispatch is an
//! explicit table of rules keyed by node tag; each rule names the category it
//! files into, so two rules may share a tag without shadowing each other.

use crate::domain::report::{
    AssignmentEntry, Category, ClassEntry, ConditionalEntry, Entry, FunctionEntry, ImportEntry,
    LoopEntry, LoopKind,
};
use crate::domain::syntax::{NodeKind, NodeTag, SyntaxNode};

/// Handlers are pure: same node, same entry. `None` means "contributes nothing".
pub type Handler = fn(&SyntaxNode) -> Option<Entry>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub tag: NodeTag,
    pub handler: Handler,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("category", &self.category)
            .field("tag", &self.tag)
            .finish()
    }
}

pub static RULES: &[Rule] = &[
    Rule { category: Category::Functions, tag: NodeTag::FunctionDef, handler: function_entry },
    Rule { category: Category::Comments, tag: NodeTag::FunctionDef, handler: function_entry },
    Rule { category: Category::Classes, tag: NodeTag::ClassDef, handler: class_entry },
    Rule { category: Category::Loops, tag: NodeTag::For, handler: for_entry },
    Rule { category: Category::Loops, tag: NodeTag::While, handler: while_entry },
    Rule { category: Category::Conditionals, tag: NodeTag::If, handler: conditional_entry },
    Rule { category: Category::Assignments, tag: NodeTag::Assign, handler: assignment_entry },
    Rule { category: Category::Imports, tag: NodeTag::Import, handler: import_entry },
    Rule { category: Category::Imports, tag: NodeTag::ImportFrom, handler: import_from_entry },
];

/// All rules registered for `tag`, in table order.
pub fn rules_for(tag: NodeTag) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.tag == tag)
}

/// Classify one node into `(category, entry)` pairs.
pub fn classify(node: &SyntaxNode) -> Vec<(Category, Entry)> {
    rules_for(node.kind.tag())
        .filter_map(|rule| (rule.handler)(node).map(|entry| (rule.category, entry)))
        .collect()
}

fn function_entry(node: &SyntaxNode) -> Option<Entry> {
    match &node.kind {
        NodeKind::FunctionDef { name, params } => Some(Entry::Function(FunctionEntry {
            name: name.clone(),
            line: node.line(),
            args: params.clone(),
        })),
        _ => None,
    }
}

fn class_entry(node: &SyntaxNode) -> Option<Entry> {
    match &node.kind {
        NodeKind::ClassDef { name } => Some(Entry::Class(ClassEntry {
            name: name.clone(),
            line: node.line(),
        })),
        _ => None,
    }
}

fn for_entry(node: &SyntaxNode) -> Option<Entry> {
    matches!(node.kind, NodeKind::For).then(|| {
        Entry::Loop(LoopEntry { kind: LoopKind::For, line: node.line() })
    })
}

fn while_entry(node: &SyntaxNode) -> Option<Entry> {
    matches!(node.kind, NodeKind::While).then(|| {
        Entry::Loop(LoopEntry { kind: LoopKind::While, line: node.line() })
    })
}

fn conditional_entry(node: &SyntaxNode) -> Option<Entry> {
    matches!(node.kind, NodeKind::If)
        .then(|| Entry::Conditional(ConditionalEntry { line: node.line() }))
}

fn assignment_entry(node: &SyntaxNode) -> Option<Entry> {
    let NodeKind::Assign { targets } = &node.kind else {
        return None;
    };
    let names: Vec<String> = targets
        .iter()
        .filter_map(|t| t.as_name())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(Entry::Assignment(AssignmentEntry { targets: names, line: node.line() }))
}

fn import_entry(node: &SyntaxNode) -> Option<Entry> {
    match &node.kind {
        NodeKind::Import { modules } => Some(Entry::Import(ImportEntry {
            modules: modules.clone(),
            from_module: None,
            line: node.line(),
        })),
        _ => None,
    }
}

fn import_from_entry(node: &SyntaxNode) -> Option<Entry> {
    match &node.kind {
        NodeKind::ImportFrom { module, names } => Some(Entry::Import(ImportEntry {
            modules: names.clone(),
            from_module: Some(module.clone()),
            line: node.line(),
        })),
        _ => None,
    }
}
