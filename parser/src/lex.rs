//! The Joe lexer

use std::{error::Error, fmt, ops::Range};

use serde::*;

use crate::{Adverb, Conjunction, Ident, Primitive};

/// Lex a Joe source text
///
/// Lexing stops at the first error.
pub fn lex(input: &str) -> Result<Vec<Sp<Token>>, Sp<LexError>> {
    Lexer::new(input).run()
}

/// An error that occurred while lexing
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnexpectedChar(char),
    UnknownGlyph(String),
    UnterminatedString,
    ExpectedCharacter,
    InvalidEscape(String),
    InvalidNumber(String),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar(c) => write!(f, "Unexpected char {c:?}"),
            LexError::UnknownGlyph(glyph) => write!(f, "Unknown glyph {glyph:?}"),
            LexError::UnterminatedString => write!(f, "Unterminated string literal"),
            LexError::ExpectedCharacter => write!(f, "Expected a character after '"),
            LexError::InvalidEscape(c) => write!(f, "Invalid escape \\{c}"),
            LexError::InvalidNumber(n) => write!(f, "Invalid number {n:?}"),
        }
    }
}

impl Error for LexError {}

/// A location in a Joe source text
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub line: u16,
    pub col: u16,
    pub byte_pos: u32,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Default for Loc {
    fn default() -> Self {
        Self {
            line: 1,
            col: 1,
            byte_pos: 0,
        }
    }
}

/// A range of a Joe source text
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CodeSpan {
    /// The starting location
    pub start: Loc,
    /// The ending location
    pub end: Loc,
}

impl CodeSpan {
    /// Get a span that covers both spans
    pub fn merge(self, other: Self) -> Self {
        CodeSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
    /// Attach a value to the span
    pub fn sp<T>(self, value: T) -> Sp<T> {
        Sp { value, span: self }
    }
    /// Get the byte range of the span
    pub fn byte_range(&self) -> Range<usize> {
        self.start.byte_pos as usize..self.end.byte_pos as usize
    }
    /// Get the text of the span
    pub fn as_str<'a>(&self, src: &'a str) -> &'a str {
        src.get(self.byte_range()).unwrap_or_default()
    }
}

impl fmt::Debug for CodeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl fmt::Display for CodeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A value with a span
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sp<T, S = CodeSpan> {
    /// The value
    pub value: T,
    /// The span
    pub span: S,
}

impl<T> Sp<T> {
    /// Map the value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sp<U> {
        Sp {
            value: f(self.value),
            span: self.span,
        }
    }
    /// Get a spanned reference to the value
    pub fn as_ref(&self) -> Sp<&T> {
        Sp {
            value: &self.value,
            span: self.span,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Sp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.span)?;
        self.value.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Sp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.value)
    }
}

impl<T: Error> Error for Sp<T> {}

/// A grouping delimiter
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    Paren,
    Brace,
    Bracket,
}

impl Delim {
    /// Whether a group opened by `open` may be closed by this delimiter
    ///
    /// `)` closes any group.
    pub fn closes(self, open: Delim) -> bool {
        self == Delim::Paren || self == open
    }
    /// The opening character
    pub fn open_char(self) -> char {
        match self {
            Delim::Paren => '(',
            Delim::Brace => '{',
            Delim::Bracket => '[',
        }
    }
    /// The closing character
    pub fn close_char(self) -> char {
        match self {
            Delim::Paren => ')',
            Delim::Brace => '}',
            Delim::Bracket => ']',
        }
    }
}

/// A built-in glyph
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Primitive(Primitive),
    Adverb(Adverb),
    Conjunction(Conjunction),
}

impl Glyph {
    /// Find the glyph with the given text
    pub fn from_text(text: &str) -> Option<Self> {
        (Primitive::from_name(text).map(Glyph::Primitive))
            .or_else(|| Adverb::from_name(text).map(Glyph::Adverb))
            .or_else(|| Conjunction::from_name(text).map(Glyph::Conjunction))
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Primitive(prim) => prim.fmt(f),
            Glyph::Adverb(adverb) => adverb.fmt(f),
            Glyph::Conjunction(conj) => conj.fmt(f),
        }
    }
}

/// A context-free Joe token
///
/// Words are not classified here. See [`crate::Tokenizer`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Token {
    Number(f64),
    Str(Ident),
    Char(char),
    Word(Ident),
    Glyph(Glyph),
    Assign,
    Open(Delim),
    Close(Delim),
    Newline,
}

impl Token {
    /// Check if the token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Str(_) | Token::Char(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "{s:?}"),
            Token::Char(c) => write!(f, "'{c}"),
            Token::Word(word) => write!(f, "{word}"),
            Token::Glyph(glyph) => write!(f, "{glyph}"),
            Token::Assign => write!(f, ":"),
            Token::Open(delim) => write!(f, "{}", delim.open_char()),
            Token::Close(delim) => write!(f, "{}", delim.close_char()),
            Token::Newline => writeln!(f),
        }
    }
}

/// Characters that can begin a glyph
pub const GLYPH_CHARS: &str = "!%=?+*<>;|-/~\\^@$#`";
/// Characters that can continue a glyph
pub const GLYPH_SUFFIXES: &str = ",:";

struct Lexer<'a> {
    chars: Vec<char>,
    input: &'a str,
    index: usize,
    loc: Loc,
    tokens: Vec<Sp<Token>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            input,
            index: 0,
            loc: Loc::default(),
            tokens: Vec::new(),
        }
    }
    fn next_char_if(&mut self, f: impl Fn(char) -> bool) -> Option<char> {
        let c = *self.chars.get(self.index)?;
        if !f(c) {
            return None;
        }
        self.index += 1;
        match c {
            '\n' => {
                self.loc.line += 1;
                self.loc.col = 1;
            }
            '\r' => {}
            _ => self.loc.col += 1,
        }
        self.loc.byte_pos += c.len_utf8() as u32;
        Some(c)
    }
    fn next_char_exact(&mut self, c: char) -> bool {
        self.next_char_if(|c2| c2 == c).is_some()
    }
    fn next_char(&mut self) -> Option<char> {
        self.next_char_if(|_| true)
    }
    fn end_span(&self, start: Loc) -> CodeSpan {
        CodeSpan {
            start,
            end: self.loc,
        }
    }
    fn end(&mut self, token: Token, start: Loc) {
        self.tokens.push(Sp {
            value: token,
            span: self.end_span(start),
        })
    }
    fn error<T>(&self, error: LexError, start: Loc) -> Result<T, Sp<LexError>> {
        Err(self.end_span(start).sp(error))
    }
    fn run(mut self) -> Result<Vec<Sp<Token>>, Sp<LexError>> {
        loop {
            let start = self.loc;
            let Some(c) = self.next_char() else {
                break;
            };
            match c {
                '\n' => self.end(Token::Newline, start),
                c if c.is_whitespace() => {}
                '(' => self.end(Token::Open(Delim::Paren), start),
                '{' => self.end(Token::Open(Delim::Brace), start),
                '[' => self.end(Token::Open(Delim::Bracket), start),
                ')' => self.end(Token::Close(Delim::Paren), start),
                '}' => self.end(Token::Close(Delim::Brace), start),
                ']' => self.end(Token::Close(Delim::Bracket), start),
                // Assignment
                ':' if matches!(self.tokens.last(), Some(tok) if matches!(tok.value, Token::Word(_))) => {
                    self.end(Token::Assign, start)
                }
                // Words
                c if c.is_ascii_uppercase() => {
                    let mut word = Ident::from(c.to_string());
                    while let Some(c) = self.next_char_if(|c| c.is_ascii_lowercase()) {
                        word.push(c);
                    }
                    self.end(Token::Word(word), start)
                }
                // Numbers
                '_' | '.' | '0'..='9' => {
                    let n = self.number(c, start)?;
                    self.end(Token::Number(n), start)
                }
                // Strings
                '"' => {
                    let mut s = Ident::new();
                    loop {
                        match self.next_char() {
                            Some('"') => break,
                            Some('\\') => s.push(self.escape(start)?),
                            Some('\n') | None => {
                                return self.error(LexError::UnterminatedString, start)
                            }
                            Some(c) => s.push(c),
                        }
                    }
                    self.end(Token::Str(s), start)
                }
                // Characters
                '\'' => {
                    let c = match self.next_char_if(|c| c != '\n') {
                        Some('\\') => self.escape(start)?,
                        Some(c) => c,
                        None => return self.error(LexError::ExpectedCharacter, start),
                    };
                    self.end(Token::Char(c), start)
                }
                // Glyphs
                c if GLYPH_CHARS.contains(c) => {
                    let mut text = c.to_string();
                    while let Some(c) = self.next_char_if(|c| GLYPH_SUFFIXES.contains(c)) {
                        text.push(c);
                    }
                    let Some(glyph) = Glyph::from_text(&text) else {
                        return self.error(LexError::UnknownGlyph(text), start);
                    };
                    self.end(Token::Glyph(glyph), start)
                }
                c => return self.error(LexError::UnexpectedChar(c), start),
            }
        }
        Ok(self.tokens)
    }
    fn number(&mut self, init: char, start: Loc) -> Result<f64, Sp<LexError>> {
        let mut got_digit = init.is_ascii_digit();
        let mut got_dot = init == '.';
        loop {
            let allow_dot = !got_dot;
            match self.next_char_if(|c| c.is_ascii_digit() || allow_dot && c == '.') {
                Some('.') => got_dot = true,
                Some(_) => got_digit = true,
                None => break,
            }
        }
        let text = self.input[start.byte_pos as usize..self.loc.byte_pos as usize].replace('_', "-");
        if !got_digit {
            return self.error(LexError::InvalidNumber(text), start);
        }
        let text = text.strip_suffix('.').unwrap_or(&text);
        match text.parse::<f64>() {
            Ok(n) => Ok(n),
            Err(_) => self.error(LexError::InvalidNumber(text.into()), start),
        }
    }
    fn escape(&mut self, start: Loc) -> Result<char, Sp<LexError>> {
        let Some(c) = self.next_char() else {
            return self.error(LexError::UnterminatedString, start);
        };
        Ok(match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'v' => '\x0b',
            's' => ' ',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.next_char_if(|c| c.is_digit(8)).and_then(|c| c.to_digit(8)) {
                        Some(d) => code = (code << 3) | d,
                        None => break,
                    }
                }
                self.code_point(code, "0", start)?
            }
            'x' => {
                let mut code = 0;
                for _ in 0..2 {
                    let Some(d) = self.next_char_if(|c| c.is_ascii_hexdigit()) else {
                        return self.error(LexError::InvalidEscape("x".into()), start);
                    };
                    code = (code << 4) | d.to_digit(16).unwrap_or_default();
                }
                self.code_point(code, "x", start)?
            }
            'u' => {
                let braced = self.next_char_exact('{');
                let mut code = 0;
                let mut digits = 0;
                while let Some(d) = self.next_char_if(|c| c.is_ascii_hexdigit()) {
                    code = (code << 4) | d.to_digit(16).unwrap_or_default();
                    digits += 1;
                    if (!braced && digits == 4) || digits > 6 {
                        break;
                    }
                }
                if digits == 0 || (braced && !self.next_char_exact('}')) {
                    return self.error(LexError::InvalidEscape("u".into()), start);
                }
                self.code_point(code, "u", start)?
            }
            c => return self.error(LexError::InvalidEscape(c.into()), start),
        })
    }
    fn code_point(&self, code: u32, escape: &str, start: Loc) -> Result<char, Sp<LexError>> {
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.error(LexError::InvalidEscape(escape.into()), start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input)
            .unwrap()
            .into_iter()
            .map(|tok| tok.value)
            .collect()
    }

    #[test]
    fn words_split_on_capitals() {
        assert_eq!(
            tokens("VOeM"),
            [
                Token::Word("V".into()),
                Token::Word("Oe".into()),
                Token::Word("M".into())
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("1 _2 .5 3.25 2Lr"),
            [
                Token::Number(1.0),
                Token::Number(-2.0),
                Token::Number(0.5),
                Token::Number(3.25),
                Token::Number(2.0),
                Token::Word("Lr".into()),
            ]
        );
        assert!(matches!(
            lex("_").unwrap_err().value,
            LexError::InvalidNumber(_)
        ));
    }

    #[test]
    fn glyph_suffixes() {
        assert_eq!(
            tokens("-,~/!"),
            [
                Token::Glyph(Glyph::Primitive(Primitive::Remove)),
                Token::Glyph(Glyph::Adverb(Adverb::Selfie)),
                Token::Glyph(Glyph::Adverb(Adverb::Fold)),
                Token::Glyph(Glyph::Primitive(Primitive::Factorial)),
            ]
        );
        assert_eq!(
            tokens("$:/,"),
            [
                Token::Glyph(Glyph::Conjunction(Conjunction::HookRight)),
                Token::Glyph(Glyph::Conjunction(Conjunction::SeedFold)),
            ]
        );
        assert_eq!(
            lex("+::").unwrap_err().value,
            LexError::UnknownGlyph("+::".into())
        );
    }

    #[test]
    fn assignment_marker() {
        assert_eq!(
            tokens("Oe : O$ME"),
            [
                Token::Word("Oe".into()),
                Token::Assign,
                Token::Word("O".into()),
                Token::Glyph(Glyph::Conjunction(Conjunction::Hook)),
                Token::Word("M".into()),
                Token::Word("E".into()),
            ]
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(
            tokens(r#""a\tb\x41\101\u{1F600}\"" '\n 'x"#),
            [
                Token::Str("a\tbAA😀\"".into()),
                Token::Char('\n'),
                Token::Char('x'),
            ]
        );
        assert_eq!(
            lex(r#""\q""#).unwrap_err().value,
            LexError::InvalidEscape("q".into())
        );
        assert_eq!(
            lex("\"abc").unwrap_err().value,
            LexError::UnterminatedString
        );
    }

    #[test]
    fn spans() {
        let toks = lex("1 +\nR").unwrap();
        assert_eq!(toks[1].span.start.col, 3);
        assert_eq!(toks[3].span.start.line, 2);
        assert_eq!(toks[3].span.as_str("1 +\nR"), "R");
    }
}
