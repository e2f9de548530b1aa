//! Token definitions for the scanned Go subset

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")] // Skip whitespace
pub enum TokenKind {
    // === Keywords the scanner dispatches on ===
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("struct")]
    Struct,
    #[token("func")]
    Func,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,
    #[token("interface")]
    Interface,

    // === Comments (kept as tokens: annotations live in them) ===
    #[regex(r"//[^\n]*", priority = 10)]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", priority = 10)]
    BlockComment,

    // === Literals ===
    #[regex(r#""(\\.|[^"\\])*""#)]
    String,
    #[regex(r"`[^`]*`")]
    RawString,
    #[regex(r"'(\\.|[^'\\])*'")]
    Rune,
    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("*")]
    Star,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,

    // Everything else inside function bodies; the scanner only needs
    // delimiters to stay balanced, not to understand these
    #[regex(r"[+\-/%=!<>&|^~:?@#$]+")]
    Op,

    // Unrecognized input
    Error,

    Eof,
}

impl TokenKind {
    /// Human-readable name for diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Package => "'package'",
            TokenKind::Import => "'import'",
            TokenKind::Type => "'type'",
            TokenKind::Struct => "'struct'",
            TokenKind::Func => "'func'",
            TokenKind::Map => "'map'",
            TokenKind::Chan => "'chan'",
            TokenKind::Interface => "'interface'",
            TokenKind::LineComment => "comment",
            TokenKind::BlockComment => "comment",
            TokenKind::String => "string literal",
            TokenKind::RawString => "string literal",
            TokenKind::Rune => "rune literal",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Star => "'*'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Dot => "'.'",
            TokenKind::Op => "operator",
            TokenKind::Error => "unrecognized input",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether this token can open a delimiter pair
    pub fn opens(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket
        )
    }

    /// The closing counterpart of an opening delimiter
    pub fn closing(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            _ => None,
        }
    }
}
