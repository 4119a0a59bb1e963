use std::{fmt, ops::Range};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    lo: usize,
    len: u32,
    line: u32,
    column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, position: Position) -> Token {
        Token {
            kind,
            lo: span.lo,
            len: span.len,
            line: position.line,
            column: position.column,
        }
    }

    /// The end-of-input token for the given source. It has an empty span at
    /// the end of the source and no real position.
    pub fn eof_for(src: &str) -> Token {
        Token::new(
            TokenKind::Eof,
            Span::new_of_length(src.len(), 0),
            Position::SENTINEL,
        )
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the source text covered by this token.
    pub fn text<'src>(&self, src: &'src str) -> &'src str {
        self.span().substr(src)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({:?}, {}, {})",
            self.kind,
            self.span(),
            self.position()
        )
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        let len = u32::try_from(hi - lo).expect("span length must fit in u32");
        Self::new_of_length(lo, len)
    }

    pub fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(self) -> usize {
        self.lo + self.len as usize
    }

    /// Returns a span that starts at `self` and ends at `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new_of_bounds(self.lo..other.hi())
    }

    pub fn substr(self, src: &str) -> &str {
        &src[self.lo..self.hi()]
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

/// A 1-based line and column pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };

    /// Position of tokens that don't correspond to a source character, such
    /// as [`TokenKind::Eof`].
    pub const SENTINEL: Position = Position { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Some value (usually an error) attached to the source span it refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Constants
    Constant,

    // Punctuators
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Dot,
    /// `->`
    Arrow,
    /// `++`
    Incr,
    /// `--`
    Decr,
    Ampersand,
    Asterisk,
    Plus,
    Minus,
    /// `~`
    BitNot,
    /// `!`
    Not,
    Divide,
    Mod,
    LShift,
    RShift,
    Lt,
    Gt,
    Le,
    Ge,
    /// `==`
    Eq,
    Ne,
    Xor,
    BitOr,
    /// `&&`
    And,
    /// `||`
    Or,
    Question,
    Colon,
    Semicolon,
    Ellipsis,
    /// `=`
    Assign,
    TimesEq,
    DivideEq,
    ModEq,
    PlusEq,
    MinusEq,
    LShiftEq,
    RShiftEq,
    AndEq,
    XorEq,
    OrEq,
    Comma,
    Hash,
    /// `##`
    Hash2,
    /// Digraph `<:`, spelling of `[`.
    LBracketAlias,
    /// Digraph `:>`, spelling of `]`.
    RBracketAlias,
    /// Digraph `<%`, spelling of `{`.
    LBraceAlias,
    /// Digraph `%>`, spelling of `}`.
    RBraceAlias,
    /// Digraph `%:`, spelling of `#`.
    HashAlias,
    /// Digraph `%:%:`, spelling of `##`.
    Hash2Alias,

    // Keywords
    Auto,
    If,
    Unsigned,
    Break,
    Inline,
    Void,
    Case,
    Int,
    Volatile,
    Char,
    Long,
    While,
    Const,
    Register,
    Alignas,
    Continue,
    Restrict,
    Alignof,
    Default,
    Return,
    Atomic,
    Do,
    Short,
    Bool,
    Double,
    Signed,
    Complex,
    Else,
    Sizeof,
    Generic,
    Enum,
    Static,
    Imaginary,
    Extern,
    Struct,
    Noreturn,
    Float,
    Switch,
    StaticAssert,
    For,
    Typedef,
    ThreadLocal,
    Goto,
    Union,

    Eof,
}

impl TokenKind {
    /// The fixed spelling of keywords and punctuators. Constants and the end
    /// of input have none.
    pub fn literal(self) -> Option<&'static str> {
        PUNCTUATORS
            .iter()
            .find(|&&(_, kind)| kind == self)
            .map(|&(literal, _)| literal)
            .or_else(|| {
                KEYWORDS
                    .entries()
                    .find(|&(_, &kind)| kind == self)
                    .map(|(&literal, _)| literal)
            })
    }
}

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "auto" => TokenKind::Auto,
    "if" => TokenKind::If,
    "unsigned" => TokenKind::Unsigned,
    "break" => TokenKind::Break,
    "inline" => TokenKind::Inline,
    "void" => TokenKind::Void,
    "case" => TokenKind::Case,
    "int" => TokenKind::Int,
    "volatile" => TokenKind::Volatile,
    "char" => TokenKind::Char,
    "long" => TokenKind::Long,
    "while" => TokenKind::While,
    "const" => TokenKind::Const,
    "register" => TokenKind::Register,
    "_Alignas" => TokenKind::Alignas,
    "continue" => TokenKind::Continue,
    "restrict" => TokenKind::Restrict,
    "_Alignof" => TokenKind::Alignof,
    "default" => TokenKind::Default,
    "return" => TokenKind::Return,
    "_Atomic" => TokenKind::Atomic,
    "do" => TokenKind::Do,
    "short" => TokenKind::Short,
    "_Bool" => TokenKind::Bool,
    "double" => TokenKind::Double,
    "signed" => TokenKind::Signed,
    "_Complex" => TokenKind::Complex,
    "else" => TokenKind::Else,
    "sizeof" => TokenKind::Sizeof,
    "_Generic" => TokenKind::Generic,
    "enum" => TokenKind::Enum,
    "static" => TokenKind::Static,
    "_Imaginary" => TokenKind::Imaginary,
    "extern" => TokenKind::Extern,
    "struct" => TokenKind::Struct,
    "_Noreturn" => TokenKind::Noreturn,
    "float" => TokenKind::Float,
    "switch" => TokenKind::Switch,
    "_Static_assert" => TokenKind::StaticAssert,
    "for" => TokenKind::For,
    "typedef" => TokenKind::Typedef,
    "_Thread_local" => TokenKind::ThreadLocal,
    "goto" => TokenKind::Goto,
    "union" => TokenKind::Union,
};

/// Every punctuator spelling. Within each family, longer spellings come
/// before their prefixes, so a linear first-match scan is maximal munch.
pub static PUNCTUATORS: &[(&str, TokenKind)] = &[
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("~", TokenKind::BitNot),
    ("?", TokenKind::Question),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("...", TokenKind::Ellipsis),
    (".", TokenKind::Dot),
    ("&=", TokenKind::AndEq),
    ("&&", TokenKind::And),
    ("&", TokenKind::Ampersand),
    ("*=", TokenKind::TimesEq),
    ("*", TokenKind::Asterisk),
    ("++", TokenKind::Incr),
    ("+=", TokenKind::PlusEq),
    ("+", TokenKind::Plus),
    ("->", TokenKind::Arrow),
    ("--", TokenKind::Decr),
    ("-=", TokenKind::MinusEq),
    ("-", TokenKind::Minus),
    ("!=", TokenKind::Ne),
    ("!", TokenKind::Not),
    ("/=", TokenKind::DivideEq),
    ("/", TokenKind::Divide),
    ("%=", TokenKind::ModEq),
    ("%>", TokenKind::RBraceAlias),
    ("%:%:", TokenKind::Hash2Alias),
    ("%:", TokenKind::HashAlias),
    ("%", TokenKind::Mod),
    ("<<=", TokenKind::LShiftEq),
    ("<<", TokenKind::LShift),
    ("<=", TokenKind::Le),
    ("<:", TokenKind::LBracketAlias),
    ("<%", TokenKind::LBraceAlias),
    ("<", TokenKind::Lt),
    (">>=", TokenKind::RShiftEq),
    (">>", TokenKind::RShift),
    (">=", TokenKind::Ge),
    (">", TokenKind::Gt),
    ("==", TokenKind::Eq),
    ("=", TokenKind::Assign),
    ("^=", TokenKind::XorEq),
    ("^", TokenKind::Xor),
    ("|=", TokenKind::OrEq),
    ("||", TokenKind::Or),
    ("|", TokenKind::BitOr),
    (":>", TokenKind::RBracketAlias),
    (":", TokenKind::Colon),
    ("##", TokenKind::Hash2),
    ("#", TokenKind::Hash),
];
