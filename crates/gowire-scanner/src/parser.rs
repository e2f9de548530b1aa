//! Declaration-subset parser for annotated Go source
//!
//! Walks the token stream produced by gowire-lexer and extracts annotated
//! providers and invocations. Only the declaration layer is parsed: package
//! clause, imports, struct type declarations and function signatures.
//! Function bodies are skipped by delimiter matching, so the scanner never
//! needs the full host grammar.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gowire_lexer::{tokenize, Token, TokenKind};
use gowire_types::{
    Dependency, Invocation, PackageNameResolver, ParseResult, Provider, ProviderKind, Span,
    TypeRef,
};

use crate::ScanError;

const ANNOTATION_PROVIDE: &str = "gowire:provide";
const ANNOTATION_INVOKE: &str = "gowire:invoke";

/// Scan one file's source text, appending discovered entities to `out`.
///
/// `import_path` is the package import path of the directory containing the
/// file; `file` is used for diagnostics only. The resolver supplies default
/// names for unaliased imports (`.../chi/v5` is referenced as `chi`).
pub fn scan_source(
    source: &str,
    import_path: &str,
    file: &Path,
    resolver: &dyn PackageNameResolver,
    out: &mut ParseResult,
) -> Result<(), ScanError> {
    let tokens = tokenize(source);
    let parser = FileParser::new(source, tokens, import_path, file, resolver);
    parser.parse(out)
}

/// A doc comment waiting to be attached to the next declaration
#[derive(Debug, Clone, Copy)]
struct DocComment {
    start_line: usize,
    end_line: usize,
    span: Span,
}

/// Annotations found in a declaration's doc block
#[derive(Debug, Default)]
struct Annotations {
    provide: Option<(String, Span)>,
    invoke: Option<Span>,
}

struct FileParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    file: PathBuf,
    import_path: &'a str,
    resolver: &'a dyn PackageNameResolver,
    /// local name -> import path, from the file's import declarations
    imports: HashMap<String, String>,
    line_starts: Vec<usize>,
}

impl<'a> FileParser<'a> {
    fn new(
        source: &'a str,
        tokens: Vec<Token>,
        import_path: &'a str,
        file: &Path,
        resolver: &'a dyn PackageNameResolver,
    ) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            tokens,
            pos: 0,
            file: file.to_path_buf(),
            import_path,
            resolver,
            imports: HashMap::new(),
            line_starts,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("tokens should have at least EOF"))
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ScanError> {
        if self.at(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    fn syntax_error(&self, expected: &str) -> ScanError {
        ScanError::Syntax {
            expected: expected.to_string(),
            found: self.peek().describe().to_string(),
            file: self.file.clone(),
            span: self.current().span,
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    fn current_line(&self) -> usize {
        self.line_of(self.current().span.start)
    }

    // === Top level ===

    fn parse(mut self, out: &mut ParseResult) -> Result<(), ScanError> {
        let mut pending: Vec<DocComment> = Vec::new();

        while !self.at(TokenKind::Eof) {
            match self.peek() {
                TokenKind::LineComment | TokenKind::BlockComment => {
                    let span = self.current().span;
                    pending.push(DocComment {
                        start_line: self.line_of(span.start),
                        end_line: self.line_of(span.end),
                        span,
                    });
                    self.advance();
                }
                TokenKind::Package => {
                    self.advance();
                    if self.at(TokenKind::Ident) {
                        self.advance();
                    }
                    pending.clear();
                }
                TokenKind::Import => {
                    self.parse_import_decl()?;
                    pending.clear();
                }
                TokenKind::Type => {
                    self.parse_type_decl(&pending, out)?;
                    pending.clear();
                }
                TokenKind::Func => {
                    self.parse_func_decl(&pending, out)?;
                    pending.clear();
                }
                kind => {
                    if kind.opens() {
                        let _ = self.skip_balanced();
                    } else {
                        self.advance();
                    }
                    pending.clear();
                }
            }
        }
        Ok(())
    }

    /// Extract annotations from the comment block directly above a
    /// declaration. A blank line between comment and declaration detaches
    /// the block, as it does for doc comments in the host language.
    fn doc_annotations(&self, pending: &[DocComment], decl_line: usize) -> Annotations {
        let mut block = Vec::new();
        let mut expected = decl_line;
        for c in pending.iter().rev() {
            if c.end_line + 1 != expected {
                break;
            }
            block.push(*c);
            expected = c.start_line;
        }

        let mut annotations = Annotations::default();
        for c in &block {
            let text = &self.source[c.span.start..c.span.end];
            let text = text.strip_prefix("//").unwrap_or(text).trim();
            if text == ANNOTATION_PROVIDE {
                annotations.provide.get_or_insert((String::new(), c.span));
            } else if let Some(arg) = text.strip_prefix(ANNOTATION_PROVIDE) {
                if arg.starts_with(char::is_whitespace) {
                    annotations
                        .provide
                        .get_or_insert((arg.trim().to_string(), c.span));
                }
            } else if text == ANNOTATION_INVOKE || text.starts_with("gowire:invoke ") {
                annotations.invoke.get_or_insert(c.span);
            }
        }
        annotations
    }

    // === Imports ===

    fn parse_import_decl(&mut self) -> Result<(), ScanError> {
        self.consume(TokenKind::Import, "'import'")?;
        if self.at(TokenKind::LParen) {
            self.advance();
            while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
                match self.peek() {
                    TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Semicolon => {
                        self.advance();
                    }
                    _ => self.parse_import_spec()?,
                }
            }
            self.consume(TokenKind::RParen, "')'")?;
        } else {
            self.parse_import_spec()?;
        }
        Ok(())
    }

    fn parse_import_spec(&mut self) -> Result<(), ScanError> {
        let mut alias: Option<String> = None;
        if self.at(TokenKind::Ident) {
            alias = Some(self.text(&self.current().clone()).to_string());
            self.advance();
        } else if self.at(TokenKind::Dot) {
            // Dot imports put names in scope unqualified; nothing to map.
            alias = Some(".".to_string());
            self.advance();
        }

        let path_token = self.consume(TokenKind::String, "import path")?;
        let path = self.text(&path_token).trim_matches('"').to_string();

        let name = match alias {
            Some(a) => a,
            None => self.resolver.resolve_name(&path),
        };
        if name == "_" || name == "." {
            return Ok(());
        }
        self.imports.insert(name, path);
        Ok(())
    }

    // === Type declarations ===

    fn parse_type_decl(
        &mut self,
        pending: &[DocComment],
        out: &mut ParseResult,
    ) -> Result<(), ScanError> {
        let decl_line = self.current_line();
        self.consume(TokenKind::Type, "'type'")?;
        let annotations = self.doc_annotations(pending, decl_line);

        if self.at(TokenKind::LParen) {
            // Grouped declaration: the annotation applies to every struct
            // spec in the group.
            self.advance();
            while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
                match self.peek() {
                    TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Semicolon => {
                        self.advance();
                    }
                    _ => self.parse_type_spec(&annotations, out)?,
                }
            }
            self.consume(TokenKind::RParen, "')'")?;
        } else {
            self.parse_type_spec(&annotations, out)?;
        }
        Ok(())
    }

    fn parse_type_spec(
        &mut self,
        annotations: &Annotations,
        out: &mut ParseResult,
    ) -> Result<(), ScanError> {
        let name_token = self.consume(TokenKind::Ident, "type name")?;
        let name = self.text(&name_token).to_string();

        if self.at(TokenKind::LBracket) {
            if annotations.provide.is_some() {
                return Err(ScanError::UnsupportedDependency {
                    detail: format!("{}: generic types not supported", name),
                    file: self.file.clone(),
                    span: self.current().span,
                });
            }
            self.skip_balanced()?;
        }

        if self.at(TokenKind::Struct) {
            self.advance();
            self.consume(TokenKind::LBrace, "'{'")?;
            match &annotations.provide {
                Some((iface_arg, annotation_span)) => {
                    let dependencies = self.parse_struct_fields()?;
                    let provided_type = if iface_arg.is_empty() {
                        TypeRef {
                            name: name.clone(),
                            import_path: self.import_path.to_string(),
                            is_pointer: true,
                        }
                    } else {
                        self.resolve_interface_arg(iface_arg, *annotation_span)?
                    };
                    out.providers.push(Provider {
                        var_name: to_lower_camel(&name),
                        name,
                        kind: ProviderKind::Struct,
                        provided_type,
                        dependencies,
                        can_error: false,
                        import_path: self.import_path.to_string(),
                    });
                }
                None => self.skip_to_close(TokenKind::RBrace)?,
            }
        } else {
            // Alias, interface, or other spec: nothing to wire.
            self.skip_rest_of_line();
        }
        Ok(())
    }

    fn parse_struct_fields(&mut self) -> Result<Vec<Dependency>, ScanError> {
        let mut deps = Vec::new();
        loop {
            match self.peek() {
                TokenKind::RBrace => {
                    self.advance();
                    return Ok(deps);
                }
                TokenKind::Eof => return Err(self.syntax_error("'}'")),
                TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Ident => {
                    let line = self.current_line();
                    let next = self.peek_ahead(1);
                    let next_line = self
                        .tokens
                        .get(self.pos + 1)
                        .map(|t| self.line_of(t.span.start))
                        .unwrap_or(usize::MAX);

                    let is_named_field = next_line == line
                        && next != TokenKind::Dot
                        && (next == TokenKind::Comma || starts_type(next));

                    if !is_named_field {
                        // Embedded type, possibly qualified; not wireable.
                        self.skip_rest_of_line();
                        continue;
                    }

                    let first = self.advance().clone();
                    let first_name = self.text(&first).to_string();
                    while self.at(TokenKind::Comma) {
                        self.advance();
                        self.consume(TokenKind::Ident, "field name")?;
                    }

                    if is_exported(&first_name) {
                        let ty = self.parse_type()?;
                        deps.push(Dependency::field(first_name, ty));
                        if self.at(TokenKind::String) || self.at(TokenKind::RawString) {
                            self.advance();
                        }
                    } else {
                        self.skip_rest_of_line();
                    }
                }
                _ => {
                    // Embedded pointer or anything else we do not wire.
                    self.skip_rest_of_line();
                }
            }
        }
    }

    // === Function declarations ===

    fn parse_func_decl(
        &mut self,
        pending: &[DocComment],
        out: &mut ParseResult,
    ) -> Result<(), ScanError> {
        let decl_line = self.current_line();
        self.consume(TokenKind::Func, "'func'")?;

        if self.at(TokenKind::LParen) {
            // Method: receivers are never annotated entities.
            self.skip_balanced()?;
            if self.at(TokenKind::Ident) {
                self.advance();
            }
            self.skip_signature_and_body()?;
            return Ok(());
        }

        let name_token = self.consume(TokenKind::Ident, "function name")?;
        let name = self.text(&name_token).to_string();
        let annotations = self.doc_annotations(pending, decl_line);

        if annotations.provide.is_none() && annotations.invoke.is_none() {
            self.skip_signature_and_body()?;
            return Ok(());
        }

        if let (Some((_, provide_span)), Some(invoke_span)) =
            (&annotations.provide, &annotations.invoke)
        {
            return Err(ScanError::ConflictingAnnotations {
                name,
                file: self.file.clone(),
                span: provide_span.merge(*invoke_span),
            });
        }

        if self.at(TokenKind::LBracket) {
            return Err(ScanError::UnsupportedDependency {
                detail: format!("{}: generic functions not supported", name),
                file: self.file.clone(),
                span: self.current().span,
            });
        }

        let signature_span = name_token.span;
        let param_types = self.parse_params(&name)?;
        let results = self.parse_results()?;
        if self.at(TokenKind::LBrace) {
            self.skip_balanced()?;
        }

        if let Some((iface_arg, annotation_span)) = &annotations.provide {
            if results.count == 0 {
                return Err(ScanError::BadProviderSignature {
                    name,
                    reason: "provider must return a value".to_string(),
                    file: self.file.clone(),
                    span: signature_span,
                });
            }
            if results.count > 2 {
                return Err(ScanError::BadProviderSignature {
                    name,
                    reason: format!("provider must return 1 or 2 values, got {}", results.count),
                    file: self.file.clone(),
                    span: signature_span,
                });
            }
            if results.count == 2 && !results.last_is_error {
                return Err(ScanError::BadProviderSignature {
                    name,
                    reason: "second return value must be error".to_string(),
                    file: self.file.clone(),
                    span: signature_span,
                });
            }

            let first_range = results.ranges[0].clone();
            let saved = self.pos;
            self.pos = first_range.start;
            let mut provided = self.parse_type()?;
            self.pos = saved;

            if !iface_arg.is_empty() {
                provided = self.resolve_interface_arg(iface_arg, *annotation_span)?;
            }

            out.providers.push(Provider {
                var_name: to_lower_camel(&provided.name),
                name,
                kind: ProviderKind::Func,
                provided_type: provided,
                dependencies: param_types.into_iter().map(Dependency::positional).collect(),
                can_error: results.count == 2,
                import_path: self.import_path.to_string(),
            });
        } else {
            out.invocations.push(Invocation {
                name,
                dependencies: param_types,
                can_error: results.count > 0 && results.last_is_error,
                import_path: self.import_path.to_string(),
            });
        }
        Ok(())
    }

    /// Parse a parameter list into positional dependency types.
    ///
    /// Handles both named (`a, b *Config, log *Logger`) and unnamed
    /// (`*Config, *Logger`) styles; a grouped name list yields one
    /// dependency per name, as it declares one parameter per name.
    fn parse_params(&mut self, owner: &str) -> Result<Vec<TypeRef>, ScanError> {
        self.consume(TokenKind::LParen, "'('")?;
        let segments = self.split_until_close(TokenKind::RParen)?;
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        let named = self.is_named_style(&segments);
        let mut types = Vec::new();
        let after = self.pos;

        if named {
            let mut pending = 0usize;
            for seg in &segments {
                if seg.end - seg.start == 1 && self.tokens[seg.start].kind == TokenKind::Ident {
                    pending += 1;
                    continue;
                }
                self.pos = seg.start + 1; // skip the final name of the group
                let ty = self
                    .parse_type()
                    .map_err(|e| annotate_owner(e, owner))?;
                for _ in 0..pending + 1 {
                    types.push(ty.clone());
                }
                pending = 0;
            }
        } else {
            for seg in &segments {
                self.pos = seg.start;
                let ty = self
                    .parse_type()
                    .map_err(|e| annotate_owner(e, owner))?;
                types.push(ty);
            }
        }

        self.pos = after;
        Ok(types)
    }

    /// Parse a result list into positional token ranges.
    fn parse_results(&mut self) -> Result<Results, ScanError> {
        // No results: the body opens immediately, or the declaration ended
        // (body-less functions, next declaration on a following line).
        if self.at(TokenKind::LBrace) || self.at(TokenKind::Eof) {
            return Ok(Results::default());
        }
        let prev_line = self
            .tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| self.line_of(t.span.end))
            .unwrap_or(0);
        if self.current_line() > prev_line {
            return Ok(Results::default());
        }

        let mut ranges = Vec::new();
        if self.at(TokenKind::LParen) {
            self.advance();
            let segments = self.split_until_close(TokenKind::RParen)?;
            let named = self.is_named_style(&segments);
            if named {
                let mut pending = 0usize;
                for seg in &segments {
                    if seg.end - seg.start == 1 && self.tokens[seg.start].kind == TokenKind::Ident {
                        pending += 1;
                        continue;
                    }
                    let type_range = seg.start + 1..seg.end;
                    for _ in 0..pending + 1 {
                        ranges.push(type_range.clone());
                    }
                    pending = 0;
                }
            } else {
                ranges.extend(segments.iter().map(|s| s.start..s.end));
            }
        } else {
            let start = self.pos;
            self.skip_type_loose();
            ranges.push(start..self.pos);
        }

        let last_is_error = ranges.last().is_some_and(|r| {
            r.end - r.start == 1
                && self.tokens[r.start].kind == TokenKind::Ident
                && self.tokens[r.start].text(self.source) == "error"
        });

        Ok(Results {
            count: ranges.len(),
            last_is_error,
            ranges,
        })
    }

    /// Whether a comma-split list uses named (name-then-type) style.
    ///
    /// Go requires a list to be entirely named or entirely unnamed, so the
    /// last segment decides: two or more tokens with an identifier head
    /// followed by a type start means names are present.
    fn is_named_style(&self, segments: &[std::ops::Range<usize>]) -> bool {
        let Some(last) = segments.last() else {
            return false;
        };
        if last.end - last.start < 2 {
            return false;
        }
        self.tokens[last.start].kind == TokenKind::Ident
            && starts_type(self.tokens[last.start + 1].kind)
    }

    // === Types ===

    fn parse_type(&mut self) -> Result<TypeRef, ScanError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Star => {
                self.advance();
                let mut inner = self.parse_type()?;
                inner.is_pointer = true;
                Ok(inner)
            }
            TokenKind::Ident => {
                let name = self.text(&token).to_string();
                self.advance();
                if self.at(TokenKind::Dot) {
                    self.advance();
                    let sel = self.consume(TokenKind::Ident, "type name")?;
                    let sel_name = self.text(&sel).to_string();
                    match self.imports.get(&name) {
                        Some(path) => Ok(TypeRef {
                            name: sel_name,
                            import_path: path.clone(),
                            is_pointer: false,
                        }),
                        None => Err(ScanError::UnknownPackageAlias {
                            alias: name,
                            file: self.file.clone(),
                            span: token.span,
                        }),
                    }
                } else if is_builtin(&name) {
                    Ok(TypeRef {
                        name,
                        import_path: String::new(),
                        is_pointer: false,
                    })
                } else {
                    Ok(TypeRef {
                        name,
                        import_path: self.import_path.to_string(),
                        is_pointer: false,
                    })
                }
            }
            TokenKind::LBracket => Err(self.unsupported("array and slice types not supported as dependencies", token.span)),
            TokenKind::Map => Err(self.unsupported("map types not supported as dependencies", token.span)),
            TokenKind::Chan => Err(self.unsupported("channel types not supported as dependencies", token.span)),
            TokenKind::Interface => Err(self.unsupported("anonymous interface types not supported", token.span)),
            TokenKind::Func => Err(self.unsupported("function types not supported as dependencies", token.span)),
            TokenKind::Ellipsis => Err(self.unsupported("variadic parameters not supported as dependencies", token.span)),
            other => Err(self.unsupported(
                &format!("unsupported type expression: {}", other.describe()),
                token.span,
            )),
        }
    }

    fn unsupported(&self, detail: &str, span: Span) -> ScanError {
        ScanError::UnsupportedDependency {
            detail: detail.to_string(),
            file: self.file.clone(),
            span,
        }
    }

    /// Resolve a `//gowire:provide pkg.Iface` annotation argument.
    fn resolve_interface_arg(&self, arg: &str, span: Span) -> Result<TypeRef, ScanError> {
        match arg.split_once('.') {
            None => Ok(TypeRef {
                name: arg.to_string(),
                import_path: self.import_path.to_string(),
                is_pointer: false,
            }),
            Some((alias, type_name)) => match self.imports.get(alias) {
                Some(path) => Ok(TypeRef {
                    name: type_name.to_string(),
                    import_path: path.clone(),
                    is_pointer: false,
                }),
                None => Err(ScanError::UnknownPackageAlias {
                    alias: alias.to_string(),
                    file: self.file.clone(),
                    span,
                }),
            },
        }
    }

    // === Skipping ===

    /// Consume a balanced delimiter group, starting at its opening token.
    fn skip_balanced(&mut self) -> Result<(), ScanError> {
        let open = self.peek();
        let Some(close) = open.closing() else {
            return Err(self.syntax_error("opening delimiter"));
        };
        self.advance();
        self.skip_to_close(close)
    }

    /// Consume tokens through the matching `close`, tracking nesting.
    fn skip_to_close(&mut self, close: TokenKind) -> Result<(), ScanError> {
        let mut depth = 1usize;
        while depth > 0 {
            let kind = self.peek();
            match kind {
                TokenKind::Eof => return Err(self.syntax_error(close.describe())),
                k if k.opens() => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    // Well-formed input nests properly, so any closer at
                    // depth 1 is our matching one.
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    /// Split tokens into comma-separated segment ranges up to the matching
    /// closer, which is consumed. Assumes the opener was already consumed.
    fn split_until_close(
        &mut self,
        close: TokenKind,
    ) -> Result<Vec<std::ops::Range<usize>>, ScanError> {
        let mut segments = Vec::new();
        let mut start = self.pos;
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            match kind {
                TokenKind::Eof => return Err(self.syntax_error(close.describe())),
                k if k.opens() => {
                    depth += 1;
                    self.advance();
                }
                k if depth == 0 && k == close => {
                    if self.pos > start {
                        segments.push(start..self.pos);
                    }
                    self.advance();
                    return Ok(segments);
                }
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                TokenKind::Comma if depth == 0 => {
                    segments.push(start..self.pos);
                    self.advance();
                    start = self.pos;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Consume one type expression without validating its shape.
    fn skip_type_loose(&mut self) {
        match self.peek() {
            TokenKind::Star | TokenKind::Ellipsis | TokenKind::Op => {
                self.advance();
                self.skip_type_loose();
            }
            TokenKind::LBracket => {
                let _ = self.skip_balanced();
                self.skip_type_loose();
            }
            TokenKind::Map => {
                self.advance();
                if self.at(TokenKind::LBracket) {
                    let _ = self.skip_balanced();
                }
                self.skip_type_loose();
            }
            TokenKind::Chan => {
                self.advance();
                if self.at(TokenKind::Op) {
                    self.advance();
                }
                self.skip_type_loose();
            }
            TokenKind::Func => {
                let line = self.current_line();
                self.advance();
                if self.at(TokenKind::LParen) {
                    let _ = self.skip_balanced();
                }
                if self.at(TokenKind::LParen) {
                    let _ = self.skip_balanced();
                } else if self.current_line() == line && self.at(TokenKind::Ident) {
                    self.advance();
                    if self.at(TokenKind::Dot) {
                        self.advance();
                        if self.at(TokenKind::Ident) {
                            self.advance();
                        }
                    }
                }
            }
            TokenKind::Interface | TokenKind::Struct => {
                self.advance();
                if self.at(TokenKind::LBrace) {
                    let _ = self.skip_balanced();
                }
            }
            TokenKind::Ident => {
                self.advance();
                if self.at(TokenKind::Dot) {
                    self.advance();
                    if self.at(TokenKind::Ident) {
                        self.advance();
                    }
                }
            }
            _ => {
                self.advance();
            }
        }
    }

    /// Consume the remainder of a logical line, descending into any
    /// delimiter groups that happen to span lines.
    fn skip_rest_of_line(&mut self) {
        let line = self.current_line();
        loop {
            let kind = self.peek();
            if kind == TokenKind::Eof {
                return;
            }
            if self.current_line() > line {
                return;
            }
            if kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if kind.opens() {
                let _ = self.skip_balanced();
            } else {
                self.advance();
            }
        }
    }

    /// Skip an unannotated function's signature and body.
    fn skip_signature_and_body(&mut self) -> Result<(), ScanError> {
        if self.at(TokenKind::LBracket) {
            // Type parameter list
            self.skip_balanced()?;
        }
        if self.at(TokenKind::LParen) {
            self.skip_balanced()?;
        }
        if self.at(TokenKind::LParen) {
            self.skip_balanced()?;
        } else if !self.at(TokenKind::LBrace) && !self.at(TokenKind::Eof) {
            let prev_line = self
                .tokens
                .get(self.pos.saturating_sub(1))
                .map(|t| self.line_of(t.span.end))
                .unwrap_or(0);
            if self.current_line() == prev_line {
                self.skip_type_loose();
            }
        }
        if self.at(TokenKind::LBrace) {
            self.skip_balanced()?;
        }
        Ok(())
    }
}

/// Parsed result list: positional type token ranges plus the facts the
/// entity builders need.
#[derive(Debug, Default)]
struct Results {
    count: usize,
    last_is_error: bool,
    ranges: Vec<std::ops::Range<usize>>,
}

fn annotate_owner(err: ScanError, owner: &str) -> ScanError {
    match err {
        ScanError::UnsupportedDependency { detail, file, span } => {
            ScanError::UnsupportedDependency {
                detail: format!("{}: {}", owner, detail),
                file,
                span,
            }
        }
        other => other,
    }
}

fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Func
            | TokenKind::Interface
            | TokenKind::Ellipsis
    )
}

const BUILTINS: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Lower-camel a type name the way the generated variable names want it:
/// a leading run of capitals is lowered as a unit, keeping the last capital
/// when it starts the next word (`HTTPServer` becomes `httpServer`).
pub fn to_lower_camel(s: &str) -> String {
    let runes: Vec<char> = s.chars().collect();
    let n = runes.len();
    if n == 0 {
        return s.to_string();
    }
    let mut upper = 0;
    while upper < n && runes[upper].is_uppercase() {
        upper += 1;
    }
    if upper == 0 {
        return s.to_string();
    }
    if upper > 1 && upper < n {
        upper -= 1;
    }
    let head: String = runes[..upper].iter().collect::<String>().to_lowercase();
    let tail: String = runes[upper..].iter().collect();
    head + &tail
}
