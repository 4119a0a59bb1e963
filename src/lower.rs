use tracing::{debug, warn};

use crate::{
    ast::{Program, Stmt, StmtKind},
    ir::{BlockId, BlockTable, Terminator},
    token::{Span, Spanned},
};

/// Name of the block every program starts executing at.
pub const ENTRY_BLOCK: &str = "start";

pub type LowerResult<T> = Result<T, Spanned<Error>>;

/// Lowers every statement of `program` into the entry block, returning it.
pub fn lower_program(table: &mut BlockTable, program: &Program) -> LowerResult<BlockId> {
    let entry = table.find_or_create(ENTRY_BLOCK);
    let mut builder = Builder::new(table);
    for stmt in &program.stmts {
        builder.lower_stmt(entry, stmt)?;
    }

    let block = table.get(entry);
    if block.terminator().is_none() {
        let span = match (program.stmts.first(), program.stmts.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new_of_length(0, 0),
        };
        return Err(span.wrap(Error::Unterminated {
            block: block.name().into(),
        }));
    }
    debug!(blocks = table.len(), "lowered program");
    Ok(entry)
}

/// Appends the instructions of statements to blocks of a [`BlockTable`].
pub struct Builder<'t> {
    table: &'t mut BlockTable,
}

impl Builder<'_> {
    pub fn new(table: &mut BlockTable) -> Builder<'_> {
        Builder { table }
    }

    pub fn lower_stmt(&mut self, block: BlockId, stmt: &Stmt) -> LowerResult<()> {
        match &stmt.kind {
            StmtKind::Return(value) => {
                let terminator = Terminator::Return {
                    value: value.is_some(),
                };
                self.terminate(block, terminator, stmt.span);
                Ok(())
            }
            StmtKind::Compound(body) => body
                .iter()
                .try_for_each(|inner| self.lower_stmt(block, inner)),
            kind @ StmtKind::Expr(_) => Err(stmt.span.wrap(Error::Unsupported {
                what: kind.describe(),
            })),
        }
    }

    fn terminate(&mut self, block: BlockId, terminator: Terminator, span: Span) {
        let block = self.table.get_mut(block);
        if let Some(previous) = block.set_terminator(terminator) {
            warn!(
                block = block.name(),
                %span,
                ?previous,
                "terminator overwritten by a later statement"
            );
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no lowering for {what}")]
    Unsupported { what: &'static str },
    #[error("block {block} has no terminator")]
    Unterminated { block: Box<str> },
}
