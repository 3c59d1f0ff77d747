//! Target checks the grammar parser leaves out.
//!
//! `rustpython-parser` accepts any expression on the left of `=`, after
//! `del`, after `for` and after `with ... as`. Python's own parser only
//! accepts names, attributes, subscripts and (for plain stores) starred,
//! tuple and list unpacking of those. This pass walks the statement tree
//! and reports the first offending target in source order.

use rustpython_parser::ast;

/// A target expression that Python's grammar rejects.
#[derive(Debug)]
pub struct InvalidTarget<'a> {
    pub target: &'a ast::Expr,
    pub message: String,
}

impl<'a> InvalidTarget<'a> {
    fn new(target: &'a ast::Expr, message: String) -> Self {
        Self { target, message }
    }
}

/// Walk `suite` in source order and stop at the first invalid target.
pub fn check(suite: &[ast::Stmt]) -> Result<(), InvalidTarget<'_>> {
    let mut stack: Vec<&ast::Stmt> = suite.iter().rev().collect();
    while let Some(stmt) = stack.pop() {
        if let Some(invalid) = invalid_target(stmt) {
            return Err(invalid);
        }
        for block in nested_blocks(stmt).into_iter().rev() {
            stack.extend(block.iter().rev());
        }
    }
    Ok(())
}

fn invalid_target(stmt: &ast::Stmt) -> Option<InvalidTarget<'_>> {
    match stmt {
        ast::Stmt::Assign(stmt) => stmt.targets.iter().find_map(store),
        ast::Stmt::AugAssign(stmt) => augmented(&stmt.target),
        ast::Stmt::AnnAssign(stmt) => annotated(&stmt.target),
        ast::Stmt::Delete(stmt) => stmt.targets.iter().find_map(delete),
        ast::Stmt::For(stmt) => store(&stmt.target),
        ast::Stmt::AsyncFor(stmt) => store(&stmt.target),
        ast::Stmt::With(stmt) => stmt
            .items
            .iter()
            .filter_map(|item| item.optional_vars.as_deref())
            .find_map(store),
        ast::Stmt::AsyncWith(stmt) => stmt
            .items
            .iter()
            .filter_map(|item| item.optional_vars.as_deref())
            .find_map(store),
        _ => None,
    }
}

fn nested_blocks(stmt: &ast::Stmt) -> Vec<&[ast::Stmt]> {
    match stmt {
        ast::Stmt::FunctionDef(def) => vec![def.body.as_slice()],
        ast::Stmt::AsyncFunctionDef(def) => vec![def.body.as_slice()],
        ast::Stmt::ClassDef(class) => vec![class.body.as_slice()],
        ast::Stmt::For(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        ast::Stmt::AsyncFor(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        ast::Stmt::While(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        ast::Stmt::If(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        ast::Stmt::With(stmt) => vec![stmt.body.as_slice()],
        ast::Stmt::AsyncWith(stmt) => vec![stmt.body.as_slice()],
        ast::Stmt::Try(stmt) => try_blocks(&stmt.body, &stmt.handlers, &stmt.orelse, &stmt.finalbody),
        ast::Stmt::TryStar(stmt) => {
            try_blocks(&stmt.body, &stmt.handlers, &stmt.orelse, &stmt.finalbody)
        }
        ast::Stmt::Match(stmt) => stmt.cases.iter().map(|case| case.body.as_slice()).collect(),
        _ => Vec::new(),
    }
}

fn try_blocks<'a>(
    body: &'a [ast::Stmt],
    handlers: &'a [ast::ExceptHandler],
    orelse: &'a [ast::Stmt],
    finalbody: &'a [ast::Stmt],
) -> Vec<&'a [ast::Stmt]> {
    let mut blocks = vec![body];
    blocks.extend(handlers.iter().map(|handler| {
        let ast::ExceptHandler::ExceptHandler(handler) = handler;
        handler.body.as_slice()
    }));
    blocks.push(orelse);
    blocks.push(finalbody);
    blocks
}

/// `=`, `for` and `with ... as` targets.
fn store(target: &ast::Expr) -> Option<InvalidTarget<'_>> {
    match target {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) | ast::Expr::Subscript(_) => None,
        ast::Expr::Starred(starred) => store(&starred.value),
        ast::Expr::Tuple(tuple) => tuple.elts.iter().find_map(store),
        ast::Expr::List(list) => list.elts.iter().find_map(store),
        other => Some(InvalidTarget::new(
            other,
            format!("cannot assign to {}", describe(other)),
        )),
    }
}

fn delete(target: &ast::Expr) -> Option<InvalidTarget<'_>> {
    match target {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) | ast::Expr::Subscript(_) => None,
        ast::Expr::Tuple(tuple) => tuple.elts.iter().find_map(delete),
        ast::Expr::List(list) => list.elts.iter().find_map(delete),
        other => Some(InvalidTarget::new(
            other,
            format!("cannot delete {}", describe(other)),
        )),
    }
}

fn augmented(target: &ast::Expr) -> Option<InvalidTarget<'_>> {
    match target {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) | ast::Expr::Subscript(_) => None,
        other => Some(InvalidTarget::new(
            other,
            format!("'{}' is an illegal expression for augmented assignment", describe(other)),
        )),
    }
}

fn annotated(target: &ast::Expr) -> Option<InvalidTarget<'_>> {
    let message = match target {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) | ast::Expr::Subscript(_) => return None,
        ast::Expr::Tuple(_) => "only single target (not tuple) can be annotated",
        ast::Expr::List(_) => "only single target (not list) can be annotated",
        _ => "illegal target for annotation",
    };
    Some(InvalidTarget::new(target, message.to_owned()))
}

/// The name Python uses for an expression kind in target errors.
fn describe(expr: &ast::Expr) -> &'static str {
    match expr {
        ast::Expr::Call(_) => "function call",
        ast::Expr::Constant(constant) => match constant.value {
            ast::Constant::None => "None",
            ast::Constant::Bool(true) => "True",
            ast::Constant::Bool(false) => "False",
            ast::Constant::Ellipsis => "ellipsis",
            _ => "literal",
        },
        ast::Expr::Yield(_) | ast::Expr::YieldFrom(_) => "yield expression",
        ast::Expr::Await(_) => "await expression",
        ast::Expr::Compare(_) => "comparison",
        ast::Expr::Lambda(_) => "lambda",
        ast::Expr::IfExp(_) => "conditional expression",
        ast::Expr::NamedExpr(_) => "named expression",
        ast::Expr::Dict(_) => "dict literal",
        ast::Expr::Set(_) => "set display",
        ast::Expr::ListComp(_) => "list comprehension",
        ast::Expr::SetComp(_) => "set comprehension",
        ast::Expr::DictComp(_) => "dict comprehension",
        ast::Expr::GeneratorExp(_) => "generator expression",
        ast::Expr::JoinedStr(_) | ast::Expr::FormattedValue(_) => "f-string expression",
        ast::Expr::Starred(_) => "starred",
        ast::Expr::Tuple(_) => "tuple",
        ast::Expr::List(_) => "list",
        ast::Expr::Name(_) => "name",
        ast::Expr::Attribute(_) => "attribute",
        ast::Expr::Subscript(_) => "subscript",
        ast::Expr::Slice(_) => "slice",
        _ => "expression",
    }
}
