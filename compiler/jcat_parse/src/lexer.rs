//! Tokenizer.
//!
//! Turns source text into a flat token list terminated by `Eof`. Comments
//! (`//`, `#`, `/* */`) and whitespace are dropped. String literals of every
//! flavour (quoted, verbatim `@"..."`, text blocks `|||`) are decoded here so
//! the parser only ever sees their final value.

use std::fmt;

use jcat_ir::Span;

use crate::{ParseError, ParseErrorKind};

/// A token with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Decoded string literal.
    String(String),
    Number(f64),

    // Keywords
    Assert,
    Else,
    Error,
    False,
    For,
    Function,
    If,
    Import,
    ImportStr,
    ImportBin,
    In,
    Local,
    Null,
    Tailstrict,
    Then,
    SelfKw,
    Super,
    True,

    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Colon,
    DoubleColon,
    TripleColon,
    Dollar,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,

    Eof,
}

impl TokenKind {
    fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "assert" => TokenKind::Assert,
            "else" => TokenKind::Else,
            "error" => TokenKind::Error,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "importstr" => TokenKind::ImportStr,
            "importbin" => TokenKind::ImportBin,
            "in" => TokenKind::In,
            "local" => TokenKind::Local,
            "null" => TokenKind::Null,
            "tailstrict" => TokenKind::Tailstrict,
            "then" => TokenKind::Then,
            "self" => TokenKind::SelfKw,
            "super" => TokenKind::Super,
            "true" => TokenKind::True,
            _ => return None,
        })
    }

    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::String(_) => "string literal".to_owned(),
            TokenKind::Number(_) => "number literal".to_owned(),
            TokenKind::Eof => "end of file".to_owned(),
            other => format!("`{other}`"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident(name) => return f.write_str(name),
            TokenKind::String(value) => return write!(f, "{value:?}"),
            TokenKind::Number(n) => return write!(f, "{n}"),
            TokenKind::Assert => "assert",
            TokenKind::Else => "else",
            TokenKind::Error => "error",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::ImportStr => "importstr",
            TokenKind::ImportBin => "importbin",
            TokenKind::In => "in",
            TokenKind::Local => "local",
            TokenKind::Null => "null",
            TokenKind::Tailstrict => "tailstrict",
            TokenKind::Then => "then",
            TokenKind::SelfKw => "self",
            TokenKind::Super => "super",
            TokenKind::True => "true",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::TripleColon => ":::",
            TokenKind::Dollar => "$",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Eof => "<eof>",
        };
        f.write_str(text)
    }
}

/// Tokenize a whole source file.
///
/// Spans are `u32` byte offsets, so sources longer than `u32::MAX` bytes are
/// rejected before lexing starts.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    check_source_len(source.len())?;
    let mut lexer = Lexer { source, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

fn check_source_len(len: usize) -> Result<(), ParseError> {
    if u32::try_from(len).is_err() {
        return Err(ParseError::new(
            ParseErrorKind::SourceTooLarge(len),
            Span::DUMMY,
        ));
    }
    Ok(())
}

struct Lexer<'src> {
    source: &'src str,
    pos: usize,
}

impl Lexer<'_> {
    #[inline]
    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source length checked against u32::MAX in tokenize"
    )]
    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    fn error(&self, kind: ParseErrorKind, start: usize) -> ParseError {
        ParseError::new(kind, self.span_from(start))
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => self.skip_line(),
                Some('/') if self.peek_at(1) == Some('/') => self.skip_line(),
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.rest().find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => {
                            self.pos = self.source.len();
                            return Err(self.error(ParseErrorKind::UnterminatedComment, start));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.source.len(),
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: self.span_from(start),
            });
        };

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '$' => TokenKind::Dollar,
            ':' => {
                if self.eat(':') {
                    if self.eat(':') {
                        TokenKind::TripleColon
                    } else {
                        TokenKind::DoubleColon
                    }
                } else {
                    TokenKind::Colon
                }
            }
            '=' => self.pick('=', TokenKind::EqEq, TokenKind::Assign),
            '!' => self.pick('=', TokenKind::BangEq, TokenKind::Bang),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::Tilde,
            '^' => TokenKind::Caret,
            '&' => self.pick('&', TokenKind::AmpAmp, TokenKind::Amp),
            '|' if self.rest().starts_with("||") => {
                self.pos += 2;
                TokenKind::String(self.text_block(start)?)
            }
            '|' => self.pick('|', TokenKind::PipePipe, TokenKind::Pipe),
            '<' => {
                if self.eat('<') {
                    TokenKind::Shl
                } else {
                    self.pick('=', TokenKind::LtEq, TokenKind::Lt)
                }
            }
            '>' => {
                if self.eat('>') {
                    TokenKind::Shr
                } else {
                    self.pick('=', TokenKind::GtEq, TokenKind::Gt)
                }
            }
            '"' | '\'' => TokenKind::String(self.quoted(c, start)?),
            '@' => match self.bump() {
                Some(q @ ('"' | '\'')) => TokenKind::String(self.verbatim(q, start)?),
                _ => return Err(self.error(ParseErrorKind::UnexpectedChar('@'), start)),
            },
            c if c.is_ascii_digit() => TokenKind::Number(self.number(start)?),
            c if c == '_' || c.is_ascii_alphabetic() => {
                while self
                    .peek()
                    .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric())
                {
                    self.bump();
                }
                let ident = &self.source[start..self.pos];
                TokenKind::keyword(ident).unwrap_or_else(|| TokenKind::Ident(ident.to_owned()))
            }
            other => return Err(self.error(ParseErrorKind::UnexpectedChar(other), start)),
        };

        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    #[inline]
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    #[inline]
    fn pick(&mut self, next: char, two: TokenKind, one: TokenKind) -> TokenKind {
        if self.eat(next) {
            two
        } else {
            one
        }
    }

    fn number(&mut self, start: usize) -> Result<f64, ParseError> {
        self.digits();
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(ParseErrorKind::InvalidNumber, start));
            }
            self.digits();
        }
        self.source[start..self.pos]
            .parse()
            .map_err(|_| self.error(ParseErrorKind::InvalidNumber, start))
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    /// `"..."` or `'...'` with JSON-style escapes.
    fn quoted(&mut self, quote: char, start: usize) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => {
                    let escape_start = self.pos - 1;
                    let decoded = match self.bump() {
                        None => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.unicode_escape(escape_start)?,
                        Some(other) => {
                            return Err(
                                self.error(ParseErrorKind::InvalidEscape(other), escape_start)
                            )
                        }
                    };
                    value.push(decoded);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, escape_start: usize) -> Result<char, ParseError> {
        let high = self.hex4(escape_start)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| self.error(ParseErrorKind::InvalidUnicodeEscape, escape_start));
        }
        // Surrogate pair: a second \uXXXX must follow
        if !self.rest().starts_with("\\u") {
            return Err(self.error(ParseErrorKind::InvalidUnicodeEscape, escape_start));
        }
        self.pos += 2;
        let low = self.hex4(escape_start)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error(ParseErrorKind::InvalidUnicodeEscape, escape_start));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidUnicodeEscape, escape_start))
    }

    fn hex4(&mut self, escape_start: usize) -> Result<u32, ParseError> {
        let digits = self.rest().get(..4).unwrap_or_default();
        let value = (digits.len() == 4 && digits.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| u32::from_str_radix(digits, 16).ok())
            .flatten()
            .ok_or_else(|| self.error(ParseErrorKind::InvalidUnicodeEscape, escape_start))?;
        self.pos += 4;
        Ok(value)
    }

    /// `@"..."`: no escapes except a doubled quote.
    fn verbatim(&mut self, quote: char, start: usize) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
                Some(c) if c == quote => {
                    if self.eat(quote) {
                        value.push(quote);
                    } else {
                        return Ok(value);
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// `|||` text block. The opening `|||` has been consumed.
    ///
    /// The first content line fixes the indentation every following line
    /// must start with; the block ends at the first line holding only
    /// whitespace and `|||`. `|||-` drops the final newline.
    fn text_block(&mut self, start: usize) -> Result<String, ParseError> {
        let chomp = self.eat('-');
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
        if !self.eat('\n') {
            return Err(self.error(ParseErrorKind::UnterminatedTextBlock, start));
        }

        // Leading blank lines are kept as-is
        let mut value = String::new();
        while self.peek() == Some('\n') {
            self.bump();
            value.push('\n');
        }

        let indent_len = self
            .rest()
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(self.rest().len());
        if indent_len == 0 {
            return Err(self.error(ParseErrorKind::TextBlockIndent, start));
        }
        let indent = self.source[self.pos..self.pos + indent_len].to_owned();

        loop {
            if self.rest().starts_with(indent.as_str()) {
                self.pos += indent.len();
                let line_end = self.rest().find('\n').map(|i| i + 1);
                let Some(line_end) = line_end else {
                    return Err(self.error(ParseErrorKind::UnterminatedTextBlock, start));
                };
                value.push_str(&self.rest()[..line_end]);
                self.pos += line_end;
                continue;
            }
            if self.peek() == Some('\n') {
                self.bump();
                value.push('\n');
                continue;
            }
            // A less-indented line must be the terminator
            let ws = self
                .rest()
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(self.rest().len());
            if self.rest()[ws..].starts_with("|||") {
                self.pos += ws + 3;
                if chomp && value.ends_with('\n') {
                    value.pop();
                }
                return Ok(value);
            }
            if self.pos + ws >= self.source.len() {
                return Err(self.error(ParseErrorKind::UnterminatedTextBlock, start));
            }
            return Err(self.error(ParseErrorKind::TextBlockIndent, start));
        }
    }
}
