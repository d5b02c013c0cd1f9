//! Closed classification of the syntax the engine understands

use swc_ecma_ast::{
    AssignExpr, BinExpr, CallExpr, Decl, DefaultDecl, ExportAll, Expr, FnDecl, ForStmt, IfStmt,
    ImportDecl, ModuleDecl, ModuleItem, NamedExport, ReturnStmt, Stmt, SwitchStmt, TryStmt,
    VarDecl, WhileStmt,
};

/// The shapes an `export` statement takes.
#[derive(Debug, Clone, Copy)]
pub enum ExportForm<'a> {
    Declaration(&'a Decl),
    DefaultDeclaration(&'a DefaultDecl),
    DefaultExpression(&'a Expr),
    Named(&'a NamedExport),
    All(&'a ExportAll),
}

/// One arm per handler. Anything without one is `Unsupported` and skipped.
#[derive(Debug, Clone, Copy)]
pub enum Construct<'a> {
    Variable(&'a VarDecl),
    Function(&'a FnDecl),
    Import(&'a ImportDecl),
    Export(ExportForm<'a>),
    Assignment(&'a AssignExpr),
    Call { call: &'a CallExpr, awaited: bool },
    Logic(&'a BinExpr),
    If(&'a IfStmt),
    While(&'a WhileStmt),
    For(&'a ForStmt),
    Switch(&'a SwitchStmt),
    Try(&'a TryStmt),
    Return(&'a ReturnStmt),
    Unsupported(&'static str),
}

impl<'a> Construct<'a> {
    pub fn of_item(item: &'a ModuleItem) -> Self {
        match item {
            ModuleItem::Stmt(stmt) => Self::of_stmt(stmt),
            ModuleItem::ModuleDecl(decl) => match decl {
                ModuleDecl::Import(import) => Construct::Import(import),
                ModuleDecl::ExportDecl(export) => {
                    Construct::Export(ExportForm::Declaration(&export.decl))
                }
                ModuleDecl::ExportDefaultDecl(export) => {
                    Construct::Export(ExportForm::DefaultDeclaration(&export.decl))
                }
                ModuleDecl::ExportDefaultExpr(export) => {
                    Construct::Export(ExportForm::DefaultExpression(&export.expr))
                }
                ModuleDecl::ExportNamed(named) => Construct::Export(ExportForm::Named(named)),
                ModuleDecl::ExportAll(all) => Construct::Export(ExportForm::All(all)),
                _ => Construct::Unsupported("typescript module declaration"),
            },
        }
    }

    pub fn of_stmt(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Decl(Decl::Var(var)) => Construct::Variable(var),
            Stmt::Decl(Decl::Fn(func)) => Construct::Function(func),
            Stmt::Decl(_) => Construct::Unsupported("declaration"),
            Stmt::Expr(expr_stmt) => Self::of_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => Construct::If(if_stmt),
            Stmt::While(while_stmt) => Construct::While(while_stmt),
            Stmt::For(for_stmt) => Construct::For(for_stmt),
            Stmt::Switch(switch) => Construct::Switch(switch),
            Stmt::Try(try_stmt) => Construct::Try(try_stmt),
            Stmt::Return(ret) => Construct::Return(ret),
            Stmt::Block(_) => Construct::Unsupported("block"),
            Stmt::DoWhile(_) => Construct::Unsupported("do-while"),
            Stmt::ForIn(_) | Stmt::ForOf(_) => Construct::Unsupported("for-in/of"),
            Stmt::Throw(_) => Construct::Unsupported("throw"),
            Stmt::Break(_) | Stmt::Continue(_) => Construct::Unsupported("jump"),
            Stmt::Labeled(_) => Construct::Unsupported("labeled"),
            _ => Construct::Unsupported("statement"),
        }
    }

    fn of_expr(expr: &'a Expr) -> Self {
        match expr {
            Expr::Call(call) => Construct::Call {
                call,
                awaited: false,
            },
            Expr::Await(await_expr) => match &*await_expr.arg {
                Expr::Call(call) => Construct::Call {
                    call,
                    awaited: true,
                },
                _ => Construct::Unsupported("await"),
            },
            Expr::Assign(assign) => Construct::Assignment(assign),
            Expr::Bin(bin) => Construct::Logic(bin),
            Expr::Paren(paren) => Self::of_expr(&paren.expr),
            _ => Construct::Unsupported("expression"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Construct::Variable(_) => "variable",
            Construct::Function(_) => "function",
            Construct::Import(_) => "import",
            Construct::Export(_) => "export",
            Construct::Assignment(_) => "assignment",
            Construct::Call { .. } => "call",
            Construct::Logic(_) => "logic",
            Construct::If(_) => "if",
            Construct::While(_) => "while",
            Construct::For(_) => "for",
            Construct::Switch(_) => "switch",
            Construct::Try(_) => "try",
            Construct::Return(_) => "return",
            Construct::Unsupported(what) => *what,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn classify(code: &str) -> &'static str {
        let parsed = Parser::new().parse(code).unwrap();
        Construct::of_item(&parsed.module.body[0]).name()
    }

    #[test]
    fn classifies_supported_statements() {
        assert_eq!(classify("let a = 1;"), "variable");
        assert_eq!(classify("function f() {}"), "function");
        assert_eq!(classify("a = 2;"), "assignment");
        assert_eq!(classify("foo();"), "call");
        assert_eq!(classify("(foo());"), "call");
        assert_eq!(classify("a && b;"), "logic");
        assert_eq!(classify("export const x = 1;"), "export");
        assert_eq!(classify("import x from 'y';"), "import");
    }

    #[test]
    fn unsupported_statements_are_named() {
        assert_eq!(classify("do { } while (x);"), "do-while");
        assert_eq!(classify("class A {}"), "declaration");
        assert_eq!(classify("x++;"), "expression");
        assert_eq!(classify("{ foo(); }"), "block");
    }
}
