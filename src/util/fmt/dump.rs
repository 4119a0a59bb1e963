//! Debug dumps of the intermediate pipeline stages.

use std::io::Write;

use super::sp;
use crate::{ir::BlockTable, token::Token};

/// Prints one line per token: its kind, its text (except for the end of
/// input) and its position.
pub fn print_tokens(w: &mut impl Write, src: &str, tokens: &[Token]) -> std::io::Result<()> {
    for token in tokens {
        let kind = token.kind;
        let pos = token.position();
        if token.is_eof() {
            writeln!(w, "{kind:?} line: {} column: {}", pos.line, pos.column)?;
        } else {
            let text = token.text(src);
            writeln!(
                w,
                "{kind:?} '{text}' line: {} column: {}",
                pos.line, pos.column
            )?;
        }
    }
    Ok(())
}

pub fn print_ir_string(table: &BlockTable) -> String {
    let mut buf = Vec::with_capacity(256);
    print_ir(&mut buf, table).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("block names are UTF-8")
}

/// Prints every block in creation order: its name, then one line per
/// instruction and one for its terminator.
pub fn print_ir(w: &mut impl Write, table: &BlockTable) -> std::io::Result<()> {
    for block in table.iter() {
        writeln!(w, "{}:", block.name())?;
        for instruction in block.instructions() {
            sp(w, 1)?;
            writeln!(w, "{instruction}")?;
        }
        sp(w, 1)?;
        match block.terminator() {
            Some(terminator) => writeln!(w, "{terminator}")?,
            None => writeln!(w, "<unterminated>")?,
        }
    }
    Ok(())
}
