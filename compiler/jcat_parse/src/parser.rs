//! Recursive-descent parser.
//!
//! Binary operators use precedence climbing over the Jsonnet table
//! (`||` binds loosest, `*` `/` `%` tightest). The keyword-led forms
//! (`local`, `function`, `if`, `assert`, `error`, `import`) extend as far
//! right as possible and may start any operand.

use jcat_ir::{
    Bind, Expr, ExprKind, Field, FieldName, Name, OpaqueKind, Params, Span, StringInterner,
};
use jcat_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::{ParseError, ParseErrorKind, Token, TokenKind};

/// Binding power of a binary operator, or `None` for non-operators.
fn binary_precedence(kind: &TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::PipePipe => 1,
        TokenKind::AmpAmp => 2,
        TokenKind::Pipe => 3,
        TokenKind::Caret => 4,
        TokenKind::Amp => 5,
        TokenKind::EqEq | TokenKind::BangEq => 6,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq | TokenKind::In => 7,
        TokenKind::Shl | TokenKind::Shr => 8,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        _ => return None,
    })
}

/// Parser over a token list ending in `Eof`.
pub(crate) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    /// Create a parser. A list that does not end in `Eof` gets one
    /// appended at the end of its last token.
    pub(crate) fn new(mut tokens: Vec<Token>, interner: &'a StringInterner) -> Self {
        match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => {}
            last => {
                let end = last.map_or(0, |t| t.span.end);
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(end, end),
                });
            }
        }
        Parser {
            tokens,
            pos: 0,
            interner,
        }
    }

    /// Parse one expression spanning the whole input.
    pub(crate) fn parse_file(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if !self.at(&TokenKind::Eof) {
            return Err(self.unexpected("end of file"));
        }
        Ok(expr)
    }

    // --- Cursor ---

    #[inline]
    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    #[inline]
    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].kind
    }

    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    fn at(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Span, ParseError> {
        if self.at(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(ident) = self.current_kind() {
            let name = self.interner.intern(ident);
            let span = self.advance().span;
            Ok((name, span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn expect_string(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::String(value) = self.current_kind() {
            let value = value.clone();
            let span = self.advance().span;
            Ok((value, span))
        } else {
            Err(self.unexpected("string literal"))
        }
    }

    #[cold]
    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::unexpected(expected, self.current_kind().describe(), self.current_span())
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    // --- Expressions ---

    /// Parse a full expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary(0))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some(prec) = binary_precedence(self.current_kind()) {
            if prec <= min_prec {
                break;
            }
            let op = self.advance();
            if op.kind == TokenKind::In && self.at(&TokenKind::Super) {
                self.advance();
                lhs = Expr::opaque(OpaqueKind::InSuper, self.span_from(lhs.span));
                continue;
            }
            let rhs = ensure_sufficient_stack(|| self.parse_binary(prec))?;
            lhs = Expr::opaque(OpaqueKind::Binary, lhs.span.merge(rhs.span));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.current_kind() {
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Tilde => {
                let start = self.advance().span;
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                Ok(Expr::opaque(OpaqueKind::Unary, start.merge(operand.span)))
            }
            TokenKind::Local => self.parse_local(),
            TokenKind::Function => self.parse_function(),
            TokenKind::If => self.parse_conditional(),
            TokenKind::Assert => self.parse_assert_expr(),
            TokenKind::Error => {
                let start = self.advance().span;
                let message = self.parse_expr()?;
                Ok(Expr::opaque(OpaqueKind::Error, start.merge(message.span)))
            }
            TokenKind::Import | TokenKind::ImportStr | TokenKind::ImportBin => self.parse_import(),
            _ => self.parse_postfix(),
        }
    }

    /// `local a = x, f(p) = y; body`
    fn parse_local(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::Local, "`local`")?;
        let mut binds = vec![self.parse_bind()?];
        while self.eat(&TokenKind::Comma) {
            binds.push(self.parse_bind()?);
        }
        self.expect(&TokenKind::Semicolon, "`;` after local bindings")?;
        let body = self.parse_expr()?;
        let span = start.merge(body.span);
        trace!(binds = binds.len(), "parsed local");
        Ok(Expr::new(
            ExprKind::Local {
                binds,
                body: Box::new(body),
            },
            span,
        ))
    }

    /// `name = body` or the function sugar `name(params) = body`.
    fn parse_bind(&mut self) -> Result<Bind, ParseError> {
        let (name, start) = self.expect_ident()?;
        let body = if self.at(&TokenKind::LParen) {
            let params = self.parse_params()?;
            self.expect(&TokenKind::Assign, "`=`")?;
            let body = self.parse_expr()?;
            Expr::new(ExprKind::Function { params }, start.merge(body.span))
        } else {
            self.expect(&TokenKind::Assign, "`=`")?;
            self.parse_expr()?
        };
        Ok(Bind {
            name,
            span: start.merge(body.span),
            body,
        })
    }

    /// `function(params) body`
    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::Function, "`function`")?;
        let params = self.parse_params()?;
        let body = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::Function { params },
            start.merge(body.span),
        ))
    }

    /// `(a, b, c=default)`. Default values are parsed and dropped.
    fn parse_params(&mut self) -> Result<Params, ParseError> {
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut params = Params::default();
        while !self.at(&TokenKind::RParen) {
            let (name, _) = self.expect_ident()?;
            if self.eat(&TokenKind::Assign) {
                self.parse_expr()?;
                params.optional.push(name);
            } else {
                params.required.push(name);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "`)` after parameters")?;
        Ok(params)
    }

    /// `if c then a else b`
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::If, "`if`")?;
        self.parse_expr()?;
        self.expect(&TokenKind::Then, "`then`")?;
        let mut last = self.parse_expr()?;
        if self.eat(&TokenKind::Else) {
            last = self.parse_expr()?;
        }
        Ok(Expr::opaque(OpaqueKind::Conditional, start.merge(last.span)))
    }

    /// `assert cond : message; body`
    fn parse_assert_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.parse_assertion()?;
        self.expect(&TokenKind::Semicolon, "`;` after assertion")?;
        let body = self.parse_expr()?;
        Ok(Expr::opaque(OpaqueKind::Assert, start.merge(body.span)))
    }

    /// `assert cond` or `assert cond : message`, shared with object bodies.
    fn parse_assertion(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::Assert, "`assert`")?;
        self.parse_expr()?;
        if self.eat(&TokenKind::Colon) {
            self.parse_expr()?;
        }
        Ok(())
    }

    /// `import "f"`, `importstr "f"`, `importbin "f"`
    fn parse_import(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.advance();
        let (file, file_span) = self.expect_string()?;
        let span = keyword.span.merge(file_span);
        Ok(match keyword.kind {
            TokenKind::Import => Expr::new(ExprKind::Import { file }, span),
            TokenKind::ImportStr => Expr::opaque(OpaqueKind::ImportStr, span),
            _ => Expr::opaque(OpaqueKind::ImportBin, span),
        })
    }

    /// A primary expression followed by any number of `.f`, `[i]`, `(args)`
    /// and `{ ... }` suffixes.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (field, field_span) = self.expect_ident()?;
                    let span = expr.span.merge(field_span);
                    expr = Expr::new(
                        ExprKind::Index {
                            target: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => expr = self.parse_index_suffix(expr)?,
                TokenKind::LParen => {
                    self.parse_args()?;
                    self.eat(&TokenKind::Tailstrict);
                    expr = Expr::opaque(OpaqueKind::Apply, self.span_from(expr.span));
                }
                TokenKind::LBrace => {
                    self.parse_object()?;
                    expr = Expr::opaque(OpaqueKind::ApplyBrace, self.span_from(expr.span));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `[ "name" ]`, `[ expr ]` or a slice `[a:b:c]`.
    fn parse_index_suffix(&mut self, target: Expr) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LBracket, "`[`")?;

        if let (TokenKind::String(value), TokenKind::RBracket) =
            (self.current_kind(), self.peek_kind(1))
        {
            let field = self.interner.intern(value);
            self.advance();
            self.advance();
            let span = self.span_from(target.span);
            return Ok(Expr::new(
                ExprKind::Index {
                    target: Box::new(target),
                    field,
                },
                span,
            ));
        }

        let mut slice = false;
        if !self.at(&TokenKind::Colon) && !self.at(&TokenKind::DoubleColon) {
            self.parse_expr()?;
        }
        // Slice bounds: `[a:b:c]`, `[a::c]` and any of them omitted
        while matches!(
            self.current_kind(),
            TokenKind::Colon | TokenKind::DoubleColon
        ) {
            slice = true;
            self.advance();
            if !matches!(
                self.current_kind(),
                TokenKind::Colon | TokenKind::DoubleColon | TokenKind::RBracket
            ) {
                self.parse_expr()?;
            }
        }
        self.expect(&TokenKind::RBracket, "`]`")?;

        let kind = if slice {
            OpaqueKind::Slice
        } else {
            OpaqueKind::ComputedIndex
        };
        Ok(Expr::opaque(kind, self.span_from(target.span)))
    }

    /// `(a, b, name=c)` call arguments.
    fn parse_args(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::LParen, "`(`")?;
        while !self.at(&TokenKind::RParen) {
            if matches!(self.current_kind(), TokenKind::Ident(_))
                && self.peek_kind(1) == &TokenKind::Assign
            {
                self.advance();
                self.advance();
            }
            self.parse_expr()?;
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "`)` after arguments")?;
        Ok(())
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let opaque = |kind| Ok(Expr::opaque(kind, span));
        match self.current_kind() {
            TokenKind::Null => {
                self.advance();
                opaque(OpaqueKind::Null)
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                opaque(OpaqueKind::Boolean)
            }
            TokenKind::Number(_) => {
                self.advance();
                opaque(OpaqueKind::Number)
            }
            TokenKind::String(_) => {
                self.advance();
                opaque(OpaqueKind::String)
            }
            TokenKind::SelfKw => {
                self.advance();
                opaque(OpaqueKind::SelfRef)
            }
            TokenKind::Dollar => {
                self.advance();
                opaque(OpaqueKind::Dollar)
            }
            TokenKind::Super => self.parse_super(),
            TokenKind::Ident(ident) => {
                let name = self.interner.intern(ident);
                self.advance();
                Ok(Expr::new(ExprKind::Var(name), span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBrace => self.parse_object(),
            TokenKind::LBracket => self.parse_array(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `super.f` or `super[e]`
    fn parse_super(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::Super, "`super`")?;
        if self.eat(&TokenKind::Dot) {
            self.expect_ident()?;
        } else if self.eat(&TokenKind::LBracket) {
            self.parse_expr()?;
            self.expect(&TokenKind::RBracket, "`]`")?;
        } else {
            return Err(self.unexpected("`.` or `[` after `super`"));
        }
        Ok(Expr::opaque(OpaqueKind::SuperIndex, self.span_from(start)))
    }

    /// `[a, b, c]` or `[e for x in arr if cond]`
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LBracket, "`[`")?;
        let mut kind = OpaqueKind::Array;
        while !self.at(&TokenKind::RBracket) {
            self.parse_expr()?;
            if self.at(&TokenKind::For) {
                self.parse_comp_specs()?;
                kind = OpaqueKind::ArrayComprehension;
                break;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket, "`]`")?;
        Ok(Expr::opaque(kind, self.span_from(start)))
    }

    /// `for x in e (for y in e | if c)*`
    fn parse_comp_specs(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::For, "`for`")?;
        loop {
            self.expect_ident()?;
            self.expect(&TokenKind::In, "`in`")?;
            self.parse_expr()?;
            while self.eat(&TokenKind::If) {
                self.parse_expr()?;
            }
            if !self.eat(&TokenKind::For) {
                return Ok(());
            }
        }
    }

    /// `{ local l = x, name: body, f(p):: body, [k]: v, assert c }`
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LBrace, "`{`")?;
        let mut fields = Vec::new();
        let mut locals = Vec::new();
        let mut seen = FxHashSet::default();
        let mut comprehension = false;

        while !self.at(&TokenKind::RBrace) {
            match self.current_kind() {
                TokenKind::Local => {
                    self.advance();
                    locals.push(self.parse_bind()?);
                }
                TokenKind::Assert => self.parse_assertion()?,
                _ => {
                    let field = self.parse_field()?;
                    if let Some(name) = field.name.fixed() {
                        if !seen.insert(name) {
                            let duplicate = self.interner.lookup(name).to_owned();
                            return Err(ParseError::new(
                                ParseErrorKind::DuplicateField(duplicate),
                                field.span,
                            ));
                        }
                    }
                    fields.push(field);
                }
            }
            if self.at(&TokenKind::For) {
                self.parse_comp_specs()?;
                comprehension = true;
                break;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace, "`}`")?;
        let span = self.span_from(start);

        if comprehension {
            return Ok(Expr::opaque(OpaqueKind::ObjectComprehension, span));
        }
        trace!(fields = fields.len(), locals = locals.len(), "parsed object");
        Ok(Expr::new(ExprKind::Object { fields, locals }, span))
    }

    /// `name[(params)][+](:|::|:::) body`
    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.current_span();
        let name = match self.current_kind() {
            TokenKind::Ident(ident) | TokenKind::String(ident) => {
                let name = self.interner.intern(ident);
                self.advance();
                FieldName::Fixed(name)
            }
            TokenKind::LBracket => {
                self.advance();
                let name = match (self.current_kind(), self.peek_kind(1)) {
                    (TokenKind::String(value), TokenKind::RBracket) => {
                        let name = self.interner.intern(value);
                        self.advance();
                        FieldName::Fixed(name)
                    }
                    _ => {
                        self.parse_expr()?;
                        FieldName::Computed
                    }
                };
                self.expect(&TokenKind::RBracket, "`]`")?;
                name
            }
            _ => return Err(self.unexpected("field name")),
        };

        let params = if self.at(&TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };

        self.eat(&TokenKind::Plus);
        if !matches!(
            self.current_kind(),
            TokenKind::Colon | TokenKind::DoubleColon | TokenKind::TripleColon
        ) {
            return Err(self.unexpected("`:`, `::` or `:::`"));
        }
        self.advance();

        let value = self.parse_expr()?;
        let body = match params {
            Some(params) => Expr::new(ExprKind::Function { params }, start.merge(value.span)),
            None => value,
        };
        Ok(Field {
            name,
            span: start.merge(body.span),
            body,
        })
    }
}

#[cfg(test)]
mod tests;
