//! Lowers the `rustpython-parser` AST into pysift's own [`SyntaxNode`] tree.
//!
//! Only statements are lowered. Python expressions cannot contain statements,
//! and no category is derived from an expression, so the statement tree is
//! the whole tree as far as extraction is concerned.

use crate::domain::syntax::{AssignTarget, LineIndex, NodeKind, OtherKind, SourcePosition, SyntaxNode};
use rustpython_parser::ast::{self, Ranged};

pub struct Lowering<'src> {
    source: &'src str,
    index: LineIndex,
}

impl<'src> Lowering<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
        }
    }

    /// Root `Module` node holding the top-level statements.
    pub fn module(&self, suite: &[ast::Stmt]) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Module, SourcePosition::default()).with_children(self.block(suite))
    }

    pub fn position_at(&self, offset: usize) -> SourcePosition {
        self.index.position(self.source, offset)
    }

    fn block(&self, stmts: &[ast::Stmt]) -> Vec<SyntaxNode> {
        stmts.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn body_and_orelse(&self, body: &[ast::Stmt], orelse: &[ast::Stmt]) -> Vec<SyntaxNode> {
        let mut children = self.block(body);
        children.extend(self.block(orelse));
        children
    }

    fn stmt(&self, stmt: &ast::Stmt) -> SyntaxNode {
        let start = usize::from(stmt.start());
        let anchor = match stmt {
            ast::Stmt::FunctionDef(def) => self.after_decorators(start, &def.decorator_list),
            ast::Stmt::AsyncFunctionDef(def) => self.after_decorators(start, &def.decorator_list),
            ast::Stmt::ClassDef(class) => self.after_decorators(start, &class.decorator_list),
            _ => start,
        };
        let position = self.position_at(anchor);
        let (kind, children) = match stmt {
            ast::Stmt::FunctionDef(def) => (
                NodeKind::FunctionDef {
                    name: def.name.as_str().to_owned(),
                    params: def
                        .args
                        .args
                        .iter()
                        .map(|param| param.def.arg.as_str().to_owned())
                        .collect(),
                },
                self.block(&def.body),
            ),
            ast::Stmt::AsyncFunctionDef(def) => {
                (NodeKind::Other(OtherKind::AsyncFunctionDef), self.block(&def.body))
            }
            ast::Stmt::ClassDef(class) => (
                NodeKind::ClassDef {
                    name: class.name.as_str().to_owned(),
                },
                self.block(&class.body),
            ),
            ast::Stmt::For(stmt) => (NodeKind::For, self.body_and_orelse(&stmt.body, &stmt.orelse)),
            ast::Stmt::AsyncFor(stmt) => (
                NodeKind::Other(OtherKind::AsyncFor),
                self.body_and_orelse(&stmt.body, &stmt.orelse),
            ),
            ast::Stmt::While(stmt) => (NodeKind::While, self.body_and_orelse(&stmt.body, &stmt.orelse)),
            ast::Stmt::If(stmt) => {
                // `elif` arrives as a nested If starting at the `elif` keyword.
                let kind = if self.source[start..].starts_with("elif") {
                    NodeKind::Other(OtherKind::ElifClause)
                } else {
                    NodeKind::If
                };
                (kind, self.body_and_orelse(&stmt.body, &stmt.orelse))
            }
            ast::Stmt::With(stmt) => (NodeKind::Other(OtherKind::With), self.block(&stmt.body)),
            ast::Stmt::AsyncWith(stmt) => {
                (NodeKind::Other(OtherKind::AsyncWith), self.block(&stmt.body))
            }
            ast::Stmt::Try(stmt) => (
                NodeKind::Other(OtherKind::Try),
                self.try_children(&stmt.body, &stmt.handlers, &stmt.orelse, &stmt.finalbody),
            ),
            ast::Stmt::TryStar(stmt) => (
                NodeKind::Other(OtherKind::Try),
                self.try_children(&stmt.body, &stmt.handlers, &stmt.orelse, &stmt.finalbody),
            ),
            ast::Stmt::Match(stmt) => (
                NodeKind::Other(OtherKind::Match),
                stmt.cases.iter().map(|case| self.match_case(case)).collect(),
            ),
            ast::Stmt::Assign(stmt) => (
                NodeKind::Assign {
                    targets: stmt.targets.iter().map(assign_target).collect(),
                },
                Vec::new(),
            ),
            ast::Stmt::AugAssign(_) => (NodeKind::Other(OtherKind::AugAssign), Vec::new()),
            ast::Stmt::AnnAssign(_) => (NodeKind::Other(OtherKind::AnnAssign), Vec::new()),
            ast::Stmt::Import(stmt) => (
                NodeKind::Import {
                    modules: stmt.names.iter().map(alias_name).collect(),
                },
                Vec::new(),
            ),
            ast::Stmt::ImportFrom(stmt) => (
                NodeKind::ImportFrom {
                    module: stmt.module.as_ref().map(|m| m.as_str().to_owned()),
                    names: stmt.names.iter().map(alias_name).collect(),
                },
                Vec::new(),
            ),
            _ => (NodeKind::Other(OtherKind::Statement), Vec::new()),
        };
        SyntaxNode::new(kind, position).with_children(children)
    }

    fn try_children(
        &self,
        body: &[ast::Stmt],
        handlers: &[ast::ExceptHandler],
        orelse: &[ast::Stmt],
        finalbody: &[ast::Stmt],
    ) -> Vec<SyntaxNode> {
        let mut children = self.block(body);
        children.extend(handlers.iter().map(|handler| {
            let ast::ExceptHandler::ExceptHandler(handler) = handler;
            let position = self.position_at(usize::from(handler.range.start()));
            SyntaxNode::new(NodeKind::Other(OtherKind::ExceptHandler), position)
                .with_children(self.block(&handler.body))
        }));
        children.extend(self.body_and_orelse(orelse, finalbody));
        children
    }

    fn match_case(&self, case: &ast::MatchCase) -> SyntaxNode {
        let position = self.position_at(usize::from(case.pattern.start()));
        SyntaxNode::new(NodeKind::Other(OtherKind::MatchCase), position)
            .with_children(self.block(&case.body))
    }

    /// Offset of the `def`/`class` line of a decorated definition. The
    /// reported line is the keyword's line, not the first decorator's.
    fn after_decorators(&self, start: usize, decorators: &[ast::Expr]) -> usize {
        let Some(last) = decorators.last() else {
            return start;
        };
        let mut offset = usize::from(last.end());
        let Some(newline) = self.source[offset..].find('\n') else {
            return start;
        };
        offset += newline + 1;
        for line in self.source[offset..].split_inclusive('\n') {
            let code = line.trim_start();
            if !code.trim_end().is_empty() && !code.starts_with('#') {
                return offset + (line.len() - code.len());
            }
            offset += line.len();
        }
        start
    }
}

fn alias_name(alias: &ast::Alias) -> String {
    alias.name.as_str().to_owned()
}

fn assign_target(target: &ast::Expr) -> AssignTarget {
    match target {
        ast::Expr::Name(name) => AssignTarget::Name(name.id.as_str().to_owned()),
        ast::Expr::Attribute(_) => AssignTarget::Attribute,
        ast::Expr::Subscript(_) => AssignTarget::Subscript,
        ast::Expr::Tuple(_) | ast::Expr::List(_) | ast::Expr::Starred(_) => AssignTarget::Unpack,
        _ => AssignTarget::Other,
    }
}
