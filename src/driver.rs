use std::io::Write;

use tracing::debug;

use crate::{
    emit,
    ir::BlockTable,
    lexer::{self, SUGGESTED_TOKENS_CAPACITY},
    lower, parser,
    util::fmt::{dump, tree},
    Error,
};

/// A pipeline stage after which compilation may stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Lower,
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_ir: bool,
    /// Stops after the given stage, skipping the remaining ones.
    pub stop: Option<Stage>,
}

impl Options {
    fn stops_after(&self, stage: Stage) -> bool {
        self.stop == Some(stage)
    }
}

/// Compiles `src`, writing the requested dumps and then the emitted program
/// to `out`.
pub fn compile<W: Write>(src: &str, options: &Options, mut out: W) -> Result<(), Error> {
    run(src, options, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run<W: Write>(src: &str, options: &Options, out: &mut W) -> Result<(), Error> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lexer::lex(src, &mut tokens)?;
    if options.dump_tokens {
        dump::print_tokens(out, src, &tokens)?;
    }
    if options.stops_after(Stage::Lex) {
        debug!("stopping after lexing");
        return Ok(());
    }

    let program = parser::parse_program(src, &tokens)?;
    if options.dump_ast {
        tree::print_program(out, &program)?;
    }
    if options.stops_after(Stage::Parse) {
        debug!("stopping after parsing");
        return Ok(());
    }

    let mut table = BlockTable::new();
    let entry = lower::lower_program(&mut table, &program)?;
    if options.dump_ir {
        dump::print_ir(out, &table)?;
    }
    if options.stops_after(Stage::Lower) {
        debug!("stopping after lowering");
        return Ok(());
    }

    emit::emit(out, &table, entry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn compile_string(src: &str, options: &Options) -> Result<String, Error> {
        let mut buf = Vec::new();
        compile(src, options, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    fn stop(stage: Stage) -> Options {
        Options {
            stop: Some(stage),
            ..Options::default()
        }
    }

    #[test]
    fn test_return_constant() {
        let out = compile_string("return 0;", &Options::default()).unwrap();
        assert_eq!(out, "\tret\n");
    }

    #[test]
    fn test_second_return_still_emits_one_block() {
        let out = compile_string("return 1; return 1;", &Options::default()).unwrap();
        assert_eq!(out, "\tret\n");
    }

    #[test]
    fn test_compound_statement() {
        let out = compile_string("<% { return; } %>", &Options::default()).unwrap();
        assert_eq!(out, "\tret\n");
    }

    #[test]
    fn test_dump_tokens_only() {
        let options = Options {
            dump_tokens: true,
            ..stop(Stage::Lex)
        };
        let out = compile_string("  return   42 ;", &options).unwrap();
        let expected = indoc! {"
            Return 'return' line: 1 column: 3
            Constant '42' line: 1 column: 12
            Semicolon ';' line: 1 column: 15
            Eof line: 0 column: 0
        "};
        assert_eq!(out, expected);
    }

    #[test]
    fn test_dump_tokens_maximal_munch() {
        let options = Options {
            dump_tokens: true,
            ..stop(Stage::Lex)
        };
        let out = compile_string("<<=<<<=<", &options).unwrap();
        let expected = indoc! {"
            LShiftEq '<<=' line: 1 column: 1
            LShift '<<' line: 1 column: 4
            Le '<=' line: 1 column: 6
            Lt '<' line: 1 column: 8
            Eof line: 0 column: 0
        "};
        assert_eq!(out, expected);
    }

    #[test]
    fn test_stop_after_lexing_skips_parse_errors() {
        assert_eq!(compile_string("+", &stop(Stage::Lex)).unwrap(), "");
        let error = compile_string("+", &Options::default()).unwrap_err();
        assert_eq!(error.to_string(), "0..1: expected statement, but got Plus");
    }

    #[test]
    fn test_dump_ast_only() {
        let options = Options {
            dump_ast: true,
            ..stop(Stage::Parse)
        };
        let out = compile_string("return 0;", &options).unwrap();
        assert_eq!(out, "return (0..9)\n  int 0 (7..8)\n");
    }

    #[test]
    fn test_stop_after_parsing_skips_lowering_errors() {
        assert_eq!(compile_string("1;", &stop(Stage::Parse)).unwrap(), "");
        let error = compile_string("1;", &Options::default()).unwrap_err();
        assert_eq!(error.to_string(), "0..2: no lowering for expression statement");
    }

    #[test]
    fn test_dump_ir_only() {
        let options = Options {
            dump_ir: true,
            ..stop(Stage::Lower)
        };
        let out = compile_string("return 0;", &options).unwrap();
        assert_eq!(out, "start:\n  ret\n");
    }

    #[test]
    fn test_every_dump_then_emit() {
        let options = Options {
            dump_tokens: true,
            dump_ast: true,
            dump_ir: true,
            stop: None,
        };
        let out = compile_string("return;", &options).unwrap();
        let expected = indoc! {"
            Return 'return' line: 1 column: 1
            Semicolon ';' line: 1 column: 7
            Eof line: 0 column: 0
            return (0..7)
            start:
              ret
        "};
        assert_eq!(out, format!("{expected}\tret\n"));
    }

    #[test]
    fn test_lex_error() {
        let error = compile_string("return x;", &Options::default()).unwrap_err();
        assert!(matches!(error, Error::Lex(_)));
        assert_eq!(
            error.to_string(),
            "7..9: failed to lex the rest of the program: 'x;'"
        );
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let depth = parser::MAX_NESTING * 40;
        let src = format!("{}return;{}", "{".repeat(depth), "}".repeat(depth));
        let error = compile_string(&src, &Options::default()).unwrap_err();
        assert!(matches!(error, Error::Parse(_)));
        assert_eq!(
            error.to_string(),
            "256..257: compound statements nested deeper than 256 levels"
        );
    }

    #[test]
    fn test_empty_program() {
        let error = compile_string("", &Options::default()).unwrap_err();
        assert_eq!(error.to_string(), "0..0: empty program");
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure() {
        let error = compile("return 0;", &Options::default(), ClosedWriter).unwrap_err();
        assert!(matches!(error, Error::Emit(emit::Error::Io(_))));
        assert_eq!(error.to_string(), "failed to write output: closed");

        let options = Options {
            dump_tokens: true,
            ..Options::default()
        };
        let error = compile("return 0;", &options, ClosedWriter).unwrap_err();
        assert!(matches!(error, Error::Io(_)));
    }
}
