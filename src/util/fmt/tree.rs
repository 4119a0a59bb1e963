use std::io::Write;

use super::sp;
use crate::ast::*;

pub fn print_program_string(program: &Program) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_program(&mut buf, program).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("tree output is UTF-8")
}

pub fn print_program(w: &mut impl Write, program: &Program) -> std::io::Result<()> {
    for stmt in &program.stmts {
        print_stmt(w, 0, stmt)?;
    }
    Ok(())
}

pub fn print_stmt(w: &mut impl Write, i: usize, stmt: &Stmt) -> std::io::Result<()> {
    sp(w, i)?;
    let span = stmt.span;
    match &stmt.kind {
        StmtKind::Return(value) => {
            writeln!(w, "return ({span})")?;
            if let Some(value) = value {
                print_expr(w, i + 1, value)?;
            }
        }
        StmtKind::Compound(body) => {
            writeln!(w, "compound ({span})")?;
            for inner in body {
                print_stmt(w, i + 1, inner)?;
            }
        }
        StmtKind::Expr(expr) => {
            writeln!(w, "expr ({span})")?;
            print_expr(w, i + 1, expr)?;
        }
    }
    Ok(())
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr) -> std::io::Result<()> {
    sp(w, i)?;
    let span = expr.span;
    match &expr.kind {
        ExprKind::Int(val) => writeln!(w, "int {val} ({span})"),
    }
}
