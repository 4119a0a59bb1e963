use tracing::debug;

use crate::{
    ast::{Expr, ExprKind, Program, Stmt, StmtKind},
    lexer::extract,
    token::{Span, Spanned, Token, TokenKind},
};

pub type ParseResult<T> = Result<T, Spanned<Error>>;

/// Parses a whole program from an already lexed token buffer.
///
/// The buffer must end with [`TokenKind::Eof`], as produced by
/// [`crate::lexer::lex`].
pub fn parse_program(src: &str, tokens: &[Token]) -> ParseResult<Program> {
    let program = Parser::new(src, tokens).parse_program()?;
    debug!(stmts = program.stmts.len(), "parsed program");
    Ok(program)
}

/// Parses a single statement, which must span the whole token buffer.
pub fn parse_stmt(src: &str, tokens: &[Token]) -> ParseResult<Stmt> {
    let mut p = Parser::new(src, tokens);
    let stmt = p.parse_stmt()?;
    p.consume(TokenKind::Eof)?;
    Ok(stmt)
}

/// How many compound statements may be open at once.
pub const MAX_NESTING: usize = 256;

const CLOSING_BRACES: &[TokenKind] = &[TokenKind::RBrace, TokenKind::RBraceAlias];

struct Parser<'src, 'tok> {
    src: &'src str,
    tokens: &'tok [Token],
    cursor: usize,
    /// Number of compound statements currently open.
    depth: usize,
}

impl Parser<'_, '_> {
    fn parse_program(&mut self) -> ParseResult<Program> {
        let mut stmts = Vec::with_capacity(4);
        while !self.is(TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        if stmts.is_empty() {
            let span = Span::new_of_bounds(0..self.src.len());
            return Err(span.wrap(Error::EmptyProgram));
        }
        Ok(Program { stmts })
    }

    /// Dispatches on the lookahead token to the matching statement rule.
    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let token = self.peek();
        match token.kind {
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace | TokenKind::LBraceAlias => self.parse_compound(),
            TokenKind::Constant => self.parse_expr_stmt(),
            actual => Err(token.span().wrap(Error::ExpectedStatement { actual })),
        }
    }

    // 'return' [expr] ';'
    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(TokenKind::Return)?;
        // The returned value is optional, `return;` carries none.
        let value = if self.is(TokenKind::Constant) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.consume(TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::Return(value),
            span: start.span().to(end.span()),
        })
    }

    // '{' stmt* '}'
    fn parse_compound(&mut self) -> ParseResult<Stmt> {
        let start = self.consume_any(&[TokenKind::LBrace, TokenKind::LBraceAlias])?;
        if self.depth == MAX_NESTING {
            return Err(start.span().wrap(Error::NestingTooDeep));
        }
        self.depth += 1;
        let mut body = Vec::new();
        while !CLOSING_BRACES.contains(&self.peek().kind) && !self.is(TokenKind::Eof) {
            body.push(self.parse_stmt()?);
        }
        let end = self.consume_any(CLOSING_BRACES)?;
        self.depth -= 1;
        Ok(Stmt {
            kind: StmtKind::Compound(body),
            span: start.span().to(end.span()),
        })
    }

    // expr ';'
    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        let end = self.consume(TokenKind::Semicolon)?;
        let span = expr.span.to(end.span());
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            span,
        })
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let token = self.consume(TokenKind::Constant)?;
        let Ok(value) = extract::int(token, self.src) else {
            return Err(token.span().wrap(Error::IntOutOfRange));
        };
        Ok(Expr {
            kind: ExprKind::Int(value),
            span: token.span(),
        })
    }
}

impl Parser<'_, '_> {
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok [Token]) -> Parser<'src, 'tok> {
        Parser {
            src,
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// Returns the current token.
    #[inline]
    fn peek(&self) -> Token {
        match self.tokens.get(self.cursor) {
            Some(token) => *token,
            None => Token::eof_for(self.src),
        }
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Token {
        let c = self.peek();
        self.cursor += 1;
        c
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    /// Advances if the current token matches the provided one, returning it.
    /// If not, returns an error.
    fn consume(&mut self, expect: TokenKind) -> ParseResult<Token> {
        let c = self.peek();
        if c.kind == expect {
            Ok(self.advance())
        } else {
            Err(c.span().wrap(Error::Unexpected {
                actual: c.kind,
                expected: expect,
            }))
        }
    }

    /// Advances if the current token matches any of the provided tokens,
    /// returning it. If not, returns an error.
    fn consume_any(&mut self, expect: &'static [TokenKind]) -> ParseResult<Token> {
        let c = self.peek();
        if expect.contains(&c.kind) {
            Ok(self.advance())
        } else {
            Err(c.span().wrap(Error::UnexpectedAny {
                actual: c.kind,
                expected: expect,
            }))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected token {expected:?}, but got {actual:?}")]
    Unexpected {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("expected one of {expected:?}, but got {actual:?}")]
    UnexpectedAny {
        actual: TokenKind,
        expected: &'static [TokenKind],
    },
    #[error("expected statement, but got {actual:?}")]
    ExpectedStatement { actual: TokenKind },
    #[error("parse int error, out of bounds")]
    IntOutOfRange,
    #[error("empty program")]
    EmptyProgram,
    #[error("compound statements nested deeper than {} levels", MAX_NESTING)]
    NestingTooDeep,
}
