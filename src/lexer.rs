use std::num::ParseIntError;

use tracing::debug;

use crate::token::{Position, Span, Spanned, Token, TokenKind, KEYWORDS, PUNCTUATORS};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 1_024;

pub type LexResult<T> = Result<T, Spanned<Error>>;

/// Lexes the provided string, producing the tokens into the provided buffer.
///
/// On success the buffer ends with exactly one [`TokenKind::Eof`] token.
pub fn lex(src: &str, tokens: &mut Vec<Token>) -> LexResult<()> {
    Lexer::new(src, tokens).lex()
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> LexResult<Vec<Token>> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unrecognized whitespace {0:?}")]
    UnrecognizedWhitespace(char),
    #[error("failed to lex the rest of the program: '{rest}'")]
    UnexpectedInput { rest: Box<str> },
}

/// A token kind together with the number of bytes it spans, as recognized at
/// the start of some input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub len: usize,
}

struct Lexer<'src, 'tok> {
    src: &'src str,
    cursor: usize,
    line: u32,
    column: u32,
    tokens: &'tok mut Vec<Token>,
}

impl Lexer<'_, '_> {
    /// Scans the source string until the input is exhausted.
    fn lex(mut self) -> LexResult<()> {
        assert_eq!(self.tokens.len(), 0, "must pass clean tokens buffer");
        loop {
            self.skip_whitespace()?;
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            let Some(lexeme) = scan_keyword(rest)
                .or_else(|| scan_constant(rest))
                .or_else(|| scan_punctuator(rest))
            else {
                let span = Span::new_of_bounds(self.cursor..self.src.len());
                return Err(span.wrap(Error::UnexpectedInput { rest: rest.into() }));
            };
            self.produce(lexeme);
        }
        self.tokens.push(Token::eof_for(self.src));
        debug!(tokens = self.tokens.len(), "lexed source");
        Ok(())
    }

    fn skip_whitespace(&mut self) -> LexResult<()> {
        while let Some(&byte) = self.rest().as_bytes().first() {
            match byte {
                b' ' | b'\t' => self.column += 1,
                b'\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                b'\r' | b'\x0b' | b'\x0c' => {
                    let span = Span::new_of_length(self.cursor, 1);
                    return Err(span.wrap(Error::UnrecognizedWhitespace(char::from(byte))));
                }
                _ => break,
            }
            self.cursor += 1;
        }
        Ok(())
    }
}

impl Lexer<'_, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok mut Vec<Token>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            cursor: 0,
            line: Position::START.line,
            column: Position::START.column,
            tokens,
        }
    }

    /// Returns the not yet consumed input.
    fn rest(&self) -> &str {
        &self.src[self.cursor..]
    }

    /// Produces a token at the cursor and moves past it.
    fn produce(&mut self, Lexeme { kind, len }: Lexeme) {
        let span = Span::new_of_bounds(self.cursor..self.cursor + len);
        let position = Position::new(self.line, self.column);
        self.tokens.push(Token::new(kind, span, position));
        self.cursor += len;
        // Tokens never contain line breaks.
        self.column += span.len;
    }
}

/// Recognizes a reserved word at the start of `rest`.
///
/// The whole run of letters and underscores must be a keyword; on a miss
/// nothing is consumed and the other scanners get their turn.
pub fn scan_keyword(rest: &str) -> Option<Lexeme> {
    let len = rest
        .bytes()
        .take_while(|&b| b.is_ascii_alphabetic() || b == b'_')
        .count();
    if len == 0 {
        return None;
    }
    KEYWORDS
        .get(&rest[..len])
        .map(|&kind| Lexeme { kind, len })
}

/// Recognizes a decimal integer constant at the start of `rest`.
pub fn scan_constant(rest: &str) -> Option<Lexeme> {
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    (len > 0).then_some(Lexeme {
        kind: TokenKind::Constant,
        len,
    })
}

/// Recognizes the longest punctuator at the start of `rest`.
///
/// Only catalog entries sharing the first byte are tried, in catalog order,
/// which lists longer spellings before their prefixes.
pub fn scan_punctuator(rest: &str) -> Option<Lexeme> {
    let &first = rest.as_bytes().first()?;
    PUNCTUATORS
        .iter()
        .filter(|(literal, _)| literal.as_bytes()[0] == first)
        .find(|(literal, _)| rest.starts_with(literal))
        .map(|&(literal, kind)| Lexeme {
            kind,
            len: literal.len(),
        })
}

pub mod extract {
    use super::*;

    pub fn int(token: Token, src: &str) -> Result<i64, ParseIntError> {
        debug_assert_eq!(token.kind, TokenKind::Constant);
        token.text(src).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tests_with_span_and_position() {
        use TokenKind::*;
        let cases = cases!(match .. {
            "return 0;" => [
                (Return, 0..6, (1, 1)),
                (Constant, 7..8, (1, 8)),
                (Semicolon, 8..9, (1, 9)),
                (Eof, 9..9, (0, 0)),
            ],
            "  return   42 ;" => [
                (Return, 2..8, (1, 3)),
                (Constant, 11..13, (1, 12)),
                (Semicolon, 14..15, (1, 15)),
                (Eof, 15..15, (0, 0)),
            ],
            "return\n  1\n\n;" => [
                (Return, 0..6, (1, 1)),
                (Constant, 9..10, (2, 3)),
                (Semicolon, 12..13, (4, 1)),
                (Eof, 13..13, (0, 0)),
            ],
            "\treturn\t7;" => [
                (Return, 1..7, (1, 2)),
                (Constant, 8..9, (1, 9)),
                (Semicolon, 9..10, (1, 10)),
                (Eof, 10..10, (0, 0)),
            ],
            "<<=<<<=<" => [
                (LShiftEq, 0..3, (1, 1)),
                (LShift, 3..5, (1, 4)),
                (Le, 5..7, (1, 6)),
                (Lt, 7..8, (1, 8)),
                (Eof, 8..8, (0, 0)),
            ],
            "return0" => [
                (Return, 0..6, (1, 1)),
                (Constant, 6..7, (1, 7)),
                (Eof, 7..7, (0, 0)),
            ],
            "_Static_assert _Bool while" => [
                (StaticAssert, 0..14, (1, 1)),
                (Bool, 15..20, (1, 16)),
                (While, 21..26, (1, 22)),
                (Eof, 26..26, (0, 0)),
            ],
            "%:%:%:%>" => [
                (Hash2Alias, 0..4, (1, 1)),
                (HashAlias, 4..6, (1, 5)),
                (RBraceAlias, 6..8, (1, 7)),
                (Eof, 8..8, (0, 0)),
            ],
            "+" => [(Plus, 0..1, (1, 1)), (Eof, 1..1, (0, 0))],
            "" => [(Eof, 0..0, (0, 0))],
            " \n " => [(Eof, 3..3, (0, 0))],
        });

        for (input, tokens) in cases {
            let lexed = lex_in_new(input).expect("failed to lex");
            assert_eq!(lexed, tokens.as_slice(), "input: {input:?}");
        }
    }

    #[test]
    fn test_maximal_munch() {
        for &(literal, kind) in PUNCTUATORS {
            let lexed = lex_in_new(literal).expect("failed to lex");
            let kinds: Vec<_> = lexed.iter().map(|t| t.kind).collect();
            assert_eq!(kinds, [kind, TokenKind::Eof], "literal: {literal:?}");
        }
    }

    #[test]
    fn test_span_round_trip() {
        let mut src = String::from("return 1234 _Noreturn\n");
        for (literal, _) in PUNCTUATORS {
            src.push_str(literal);
            src.push(' ');
        }
        let lexed = lex_in_new(&src).expect("failed to lex");

        let (eof, tokens) = lexed.split_last().unwrap();
        assert_eq!(tokens.len(), PUNCTUATORS.len() + 3);
        for token in tokens {
            let text = token.text(&src);
            match token.kind.literal() {
                Some(literal) => assert_eq!(text, literal),
                None => assert_eq!(text, "1234"),
            }
        }
        assert!(eof.is_eof());
        assert_eq!(eof.span().len, 0);
        assert_eq!(eof.position(), Position::SENTINEL);
    }

    #[test]
    fn test_single_eof_at_the_end() {
        for src in ["", "return", "{ return 1; }", ";;;", "1 2 3"] {
            let lexed = lex_in_new(src).expect("failed to lex");
            let eofs = lexed.iter().filter(|t| t.is_eof()).count();
            assert_eq!(eofs, 1);
            assert!(lexed.last().unwrap().is_eof());
        }
    }

    #[test]
    fn test_spans_strictly_increase() {
        let src = "return 1 ; { return ; } <<= ## ... %:%:";
        let lexed = lex_in_new(src).expect("failed to lex");
        for pair in lexed.windows(2) {
            assert!(pair[0].span().hi() <= pair[1].span().lo);
        }
    }

    #[test]
    fn test_errors() {
        let cases: &[(&str, &str)] = &[
            ("foo", "0..3: failed to lex the rest of the program: 'foo'"),
            ("return x;", "7..9: failed to lex the rest of the program: 'x;'"),
            ("returned 1;", "0..11: failed to lex the rest of the program: 'returned 1;'"),
            ("%:%:%:%>a", "8..9: failed to lex the rest of the program: 'a'"),
            ("1 @ 2", "2..5: failed to lex the rest of the program: '@ 2'"),
            ("return 0;\r\n", "9..10: unrecognized whitespace '\\r'"),
            ("\x0c", "0..1: unrecognized whitespace '\\u{c}'"),
            ("1 é", "2..4: failed to lex the rest of the program: 'é'"),
        ];
        for (input, expected) in cases {
            let error = lex_in_new(input).expect_err("should fail");
            assert_eq!(format!("{error:#}"), *expected);
        }
    }

    #[test]
    fn test_scan_punctuator_prefers_the_longest_spelling() {
        for &(literal, kind) in PUNCTUATORS {
            let input = format!("{literal}x");
            assert_eq!(
                scan_punctuator(&input),
                Some(Lexeme { kind, len: literal.len() }),
                "literal: {literal:?}"
            );
        }
        assert_eq!(
            scan_punctuator("%:%"),
            Some(Lexeme { kind: TokenKind::HashAlias, len: 2 })
        );
        assert_eq!(
            scan_punctuator("<%>"),
            Some(Lexeme { kind: TokenKind::LBraceAlias, len: 2 })
        );
    }

    #[test]
    fn test_scanners_leave_unmatched_input_alone() {
        assert_eq!(scan_keyword("int x"), Some(Lexeme { kind: TokenKind::Int, len: 3 }));
        assert_eq!(scan_keyword("integer"), None);
        assert_eq!(scan_keyword("12"), None);
        assert_eq!(scan_constant("007;"), Some(Lexeme { kind: TokenKind::Constant, len: 3 }));
        assert_eq!(scan_constant("x1"), None);
        assert_eq!(scan_punctuator("->x"), Some(Lexeme { kind: TokenKind::Arrow, len: 2 }));
        assert_eq!(scan_punctuator("$"), None);
        assert_eq!(scan_punctuator(""), None);
    }

    #[test]
    fn test_extract_int() {
        let src = "return 9223372036854775807 9223372036854775808";
        let lexed = lex_in_new(src).expect("failed to lex");
        assert_eq!(extract::int(lexed[1], src), Ok(i64::MAX));
        assert!(extract::int(lexed[2], src).is_err());
    }

    macro_rules! cases {
        (match .. {
            $($str:expr => [$(($kind:expr, $range:expr, ($line:expr, $col:expr))),* $(,)?]),* $(,)?
        }) => {{
            &[$((
                $str,
                vec![
                    $(Token::new(
                        $kind,
                        Span::new_of_bounds($range.start..$range.end),
                        Position::new($line, $col),
                    )),*
                ],
            )),*]
        }};
    }
    use cases;
}
