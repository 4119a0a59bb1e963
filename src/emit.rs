use std::io;

use tracing::debug;

use crate::ir::{BasicBlock, BlockId, BlockTable, Terminator};

/// Writes the target instructions of every block reachable from `entry`.
pub fn emit<W>(writer: W, table: &BlockTable, entry: BlockId) -> Result<(), Error>
where
    W: io::Write,
{
    Emitter::new(writer, table).emit(entry)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("block {block} has no terminator")]
    Unterminated { block: Box<str> },
}

pub struct Emitter<'t, W> {
    writer: W,
    table: &'t BlockTable,
}

impl<'t, W> Emitter<'t, W>
where
    W: io::Write,
{
    pub fn new(writer: W, table: &'t BlockTable) -> Emitter<'t, W> {
        Emitter { writer, table }
    }

    /// Follows the successor chain starting at `entry`. Each block is emitted
    /// at most once, so a chain that loops back stops at the first repeat.
    pub fn emit(mut self, entry: BlockId) -> Result<(), Error> {
        let table = self.table;
        let mut visited = vec![false; table.len()];
        let mut next = Some(entry);
        let mut emitted = 0_usize;
        while let Some(id) = next {
            if std::mem::replace(&mut visited[id.index()], true) {
                break;
            }
            let block = table.get(id);
            if id != entry {
                self.label(block)?;
            }
            self.e_block(block)?;
            emitted += 1;
            next = block.successor();
        }
        self.writer.flush()?;
        debug!(blocks = emitted, "emitted program");
        Ok(())
    }

    fn e_block(&mut self, block: &BasicBlock) -> Result<(), Error> {
        for instruction in block.instructions() {
            self.out(instruction)?;
        }
        let Some(terminator) = block.terminator() else {
            return Err(Error::Unterminated {
                block: block.name().into(),
            });
        };
        self.e_terminator(terminator)
    }

    fn e_terminator(&mut self, terminator: Terminator) -> Result<(), Error> {
        match terminator {
            Terminator::Return { value: _ } => self.out("ret"),
        }
    }
}

/// Utility functions.
impl<W> Emitter<'_, W>
where
    W: io::Write,
{
    /// Prints an instruction line.
    fn out(&mut self, f: impl std::fmt::Display) -> Result<(), Error> {
        writeln!(self.writer, "\t{f}")?;
        Ok(())
    }

    /// Prints the label line of a block.
    fn label(&mut self, block: &BasicBlock) -> Result<(), Error> {
        writeln!(self.writer, "{}:", block.name())?;
        Ok(())
    }
}
