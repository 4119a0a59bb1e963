// program ::= stmt+
// stmt ::= 'return' [expr] ';'
//        | '{' stmt* '}'
//        | expr ';'
// expr ::= constant

use crate::token::Span;

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum StmtKind {
    Return(Option<Expr>),
    /// A braced list of statements, possibly empty.
    Compound(Vec<Stmt>),
    /// An expression evaluated for its side effects.
    Expr(Expr),
}

impl StmtKind {
    /// A short human readable name for this kind of statement.
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Return(_) => "return statement",
            StmtKind::Compound(_) => "compound statement",
            StmtKind::Expr(_) => "expression statement",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
}
