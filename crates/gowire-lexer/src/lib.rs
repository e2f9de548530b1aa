//! gowire-lexer: tokenization of the Go declaration subset using logos
//!
//! The scanner never needs the full Go grammar: it reads package clauses,
//! imports, struct type declarations and function signatures, and skips
//! everything else by delimiter matching. Comments are real tokens here
//! (annotations live in them) and unrecognized input degrades to `Error`
//! tokens instead of failing, so arbitrary function bodies lex cleanly.

mod token;

pub use token::*;

use gowire_types::Span;
use logos::Logos;

/// Tokenize a source string into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// A token with its span
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_clause() {
        let tokens = tokenize("package main");
        assert_eq!(tokens[0].kind, TokenKind::Package);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_annotation_comment_is_a_token() {
        let source = "//gowire:provide\nfunc NewConfig() *Config {}";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].text(source), "//gowire:provide");
        assert_eq!(tokens[1].kind, TokenKind::Func);
    }

    #[test]
    fn test_pointer_type_tokens() {
        let tokens = tokenize("*config.Config");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Star,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_braces_inside_strings_are_opaque() {
        let tokens = tokenize(r#"fmt.Sprintf("{%d}", n)"#);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::LBrace));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn test_braces_inside_raw_strings_are_opaque() {
        let source = "x := `literal { brace`";
        let tokens = tokenize(source);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::LBrace));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::RawString));
    }

    #[test]
    fn test_ellipsis_before_dot() {
        let tokens = tokenize("...int");
        assert_eq!(tokens[0].kind, TokenKind::Ellipsis);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_block_comments_are_single_tokens() {
        for source in ["/* plain */", "/***/", "/* a ** b */", "/* { */"] {
            let tokens = tokenize(source);
            assert_eq!(tokens[0].kind, TokenKind::BlockComment, "source: {source}");
            assert_eq!(tokens[1].kind, TokenKind::Eof, "source: {source}");
        }
    }

    #[test]
    fn test_unknown_input_degrades_to_error_token() {
        let tokens = tokenize("func x() { y := a \u{2603} b }");
        // The snowman is not valid Go, but lexing keeps going.
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_body_operators_lex_without_error() {
        let source = "func f() int { return a+b*c%d | e&^f }";
        let tokens = tokenize(source);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Error));
    }
}
