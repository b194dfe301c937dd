//! Right-to-left classification of lexed tokens

use std::fmt;

use crate::{Adverb, CodeSpan, Conjunction, Delim, Glyph, Ident, Primitive, Sp, Token};

/// The live set of names a [`Tokenizer`] classifies words against
pub trait SymbolTable {
    /// Whether the name is bound to a function
    fn is_function(&self, name: &str) -> bool;
    /// Whether the name is bound to a value
    fn is_variable(&self, name: &str) -> bool;
    /// Whether the name is an adverb
    fn is_adverb(&self, name: &str) -> bool {
        Adverb::from_name(name).is_some()
    }
    /// Whether the name is a conjunction
    fn is_conjunction(&self, name: &str) -> bool {
        Conjunction::from_name(name).is_some()
    }
}

/// A classified token
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Lexeme {
    Number(f64),
    Str(Ident),
    Char(char),
    Primitive(Primitive),
    Adverb(Adverb),
    Conjunction(Conjunction),
    /// A word bound to a function
    Function(Ident),
    /// A word bound to a value
    Variable(Ident),
    /// A word with no binding
    Name(Ident),
    Assign,
    Open(Delim),
    Close(Delim),
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Number(n) => write!(f, "{n}"),
            Lexeme::Str(s) => write!(f, "{s:?}"),
            Lexeme::Char(c) => write!(f, "'{c}"),
            Lexeme::Primitive(prim) => write!(f, "{prim}"),
            Lexeme::Adverb(adverb) => write!(f, "{adverb}"),
            Lexeme::Conjunction(conj) => write!(f, "{conj}"),
            Lexeme::Function(name) | Lexeme::Variable(name) | Lexeme::Name(name) => {
                write!(f, "{name}")
            }
            Lexeme::Assign => write!(f, ":"),
            Lexeme::Open(delim) => write!(f, "{}", delim.open_char()),
            Lexeme::Close(delim) => write!(f, "{}", delim.close_char()),
        }
    }
}

/// Hands out the tokens of one statement from its trailing edge
///
/// Words are classified at the moment they are handed out, so bindings made
/// by the part of the statement already consumed are visible.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'t> {
    tokens: &'t [Sp<Token>],
}

impl<'t> Tokenizer<'t> {
    /// Create a tokenizer over the tokens of one statement
    pub fn new(tokens: &'t [Sp<Token>]) -> Self {
        Tokenizer { tokens }
    }
    /// Split lexed tokens into statements at newlines
    pub fn statements(tokens: &'t [Sp<Token>]) -> impl Iterator<Item = Tokenizer<'t>> {
        tokens
            .split(|tok| tok.value == Token::Newline)
            .filter(|stmt| !stmt.is_empty())
            .map(Tokenizer::new)
    }
    /// Whether all tokens have been consumed
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    /// The span of the remaining tokens
    pub fn span(&self) -> Option<CodeSpan> {
        let first = self.tokens.first()?;
        let last = self.tokens.last()?;
        Some(first.span.merge(last.span))
    }
    /// Consume and classify the last remaining token
    pub fn next_back(&mut self, table: &impl SymbolTable) -> Option<Sp<Lexeme>> {
        loop {
            let (last, rest) = self.tokens.split_last()?;
            self.tokens = rest;
            if let Some(lexeme) = classify(&last.value, table) {
                return Some(last.span.sp(lexeme));
            }
        }
    }
    /// Split off the group whose closing delimiter was just consumed
    ///
    /// The returned tokenizer covers exactly the enclosed tokens, and the
    /// opening delimiter is consumed from this one. Returns the opening
    /// delimiter, or `None` if there is no matching one.
    pub fn take_group(&mut self, close: Delim) -> Option<(Delim, Tokenizer<'t>)> {
        let open_index = self.matching_open(close)?;
        let Token::Open(open) = self.tokens[open_index].value else {
            return None;
        };
        let inner = Tokenizer::new(&self.tokens[open_index + 1..]);
        self.tokens = &self.tokens[..open_index];
        Some((open, inner))
    }
    fn matching_open(&self, close: Delim) -> Option<usize> {
        let mut closers = vec![close];
        for (i, tok) in self.tokens.iter().enumerate().rev() {
            match tok.value {
                Token::Close(delim) => closers.push(delim),
                Token::Open(open) => {
                    let close = closers.pop()?;
                    if !close.closes(open) {
                        return None;
                    }
                    if closers.is_empty() {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
    /// Whether the remaining tokens form a value rather than a function
    ///
    /// Decided by the rightmost token alone.
    pub fn is_value(&self, table: &impl SymbolTable) -> bool {
        let Some(last) = self.tokens.last() else {
            return false;
        };
        match &last.value {
            tok if tok.is_literal() => true,
            Token::Word(name) => table.is_variable(name),
            Token::Close(Delim::Bracket) => true,
            Token::Close(Delim::Brace) => false,
            Token::Close(close) => {
                let mut rest = *self;
                rest.tokens = &self.tokens[..self.tokens.len() - 1];
                match rest.take_group(*close) {
                    Some((Delim::Paren, inner)) => inner.is_value(table),
                    Some((Delim::Bracket, _)) => true,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

fn classify(tok: &Token, table: &impl SymbolTable) -> Option<Lexeme> {
    Some(match tok {
        Token::Number(n) => Lexeme::Number(*n),
        Token::Str(s) => Lexeme::Str(s.clone()),
        Token::Char(c) => Lexeme::Char(*c),
        Token::Glyph(Glyph::Primitive(prim)) => Lexeme::Primitive(*prim),
        Token::Glyph(Glyph::Adverb(adverb)) => Lexeme::Adverb(*adverb),
        Token::Glyph(Glyph::Conjunction(conj)) => Lexeme::Conjunction(*conj),
        Token::Word(name) => {
            if let Some(adverb) = Adverb::from_name(name).filter(|_| table.is_adverb(name)) {
                Lexeme::Adverb(adverb)
            } else if let Some(conj) =
                Conjunction::from_name(name).filter(|_| table.is_conjunction(name))
            {
                Lexeme::Conjunction(conj)
            } else if table.is_function(name) {
                Lexeme::Function(name.clone())
            } else if table.is_variable(name) {
                Lexeme::Variable(name.clone())
            } else {
                Lexeme::Name(name.clone())
            }
        }
        Token::Assign => Lexeme::Assign,
        Token::Open(delim) => Lexeme::Open(*delim),
        Token::Close(delim) => Lexeme::Close(*delim),
        Token::Newline => return None,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::lex;

    #[derive(Default)]
    struct Table {
        functions: HashSet<&'static str>,
        variables: HashSet<&'static str>,
    }

    impl SymbolTable for Table {
        fn is_function(&self, name: &str) -> bool {
            self.functions.contains(name)
        }
        fn is_variable(&self, name: &str) -> bool {
            self.variables.contains(name)
        }
    }

    fn drain(tokenizer: &mut Tokenizer, table: &Table) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();
        while let Some(lexeme) = tokenizer.next_back(table) {
            lexemes.push(lexeme.value);
        }
        lexemes
    }

    #[test]
    fn classifies_right_to_left() {
        let tokens = lex("X+F M").unwrap();
        let mut table = Table::default();
        table.functions.insert("F");
        let mut tokenizer = Tokenizer::new(&tokens);
        assert_eq!(
            tokenizer.next_back(&table).unwrap().value,
            Lexeme::Adverb(Adverb::Map)
        );
        assert_eq!(
            tokenizer.next_back(&table).unwrap().value,
            Lexeme::Function("F".into())
        );
        // A binding made now affects words not yet consumed
        table.variables.insert("X");
        assert_eq!(
            drain(&mut tokenizer, &table),
            [
                Lexeme::Primitive(Primitive::Add),
                Lexeme::Variable("X".into())
            ]
        );
        assert!(tokenizer.is_empty());
    }

    #[test]
    fn groups() {
        let tokens = lex("1+(2*(3))-[4]").unwrap();
        let table = Table::default();
        let mut tokenizer = Tokenizer::new(&tokens);
        assert_eq!(
            tokenizer.next_back(&table).unwrap().value,
            Lexeme::Close(Delim::Bracket)
        );
        let (open, mut inner) = tokenizer.take_group(Delim::Bracket).unwrap();
        assert_eq!(open, Delim::Bracket);
        assert_eq!(drain(&mut inner, &table), [Lexeme::Number(4.0)]);
        assert_eq!(
            tokenizer.next_back(&table).unwrap().value,
            Lexeme::Primitive(Primitive::Sub)
        );
        assert_eq!(
            tokenizer.next_back(&table).unwrap().value,
            Lexeme::Close(Delim::Paren)
        );
        let (open, inner) = tokenizer.take_group(Delim::Paren).unwrap();
        assert_eq!(open, Delim::Paren);
        assert!(inner.is_value(&table));
        assert_eq!(inner.tokens.len(), 5);
        assert_eq!(
            drain(&mut tokenizer, &table),
            [Lexeme::Primitive(Primitive::Add), Lexeme::Number(1.0)]
        );
    }

    #[test]
    fn mismatched_groups() {
        let table = Table::default();
        for src in ["{1]", "1]", "[1}"] {
            let tokens = lex(src).unwrap();
            let mut tokenizer = Tokenizer::new(&tokens);
            let Some(Sp {
                value: Lexeme::Close(close),
                ..
            }) = tokenizer.next_back(&table)
            else {
                panic!("expected a closing delimiter in {src:?}");
            };
            assert!(tokenizer.take_group(close).is_none(), "{src:?}");
        }
        // `)` closes any group
        let tokens = lex("{1)").unwrap();
        let mut tokenizer = Tokenizer::new(&tokens);
        tokenizer.next_back(&table);
        assert_eq!(
            tokenizer.take_group(Delim::Paren).map(|(open, _)| open),
            Some(Delim::Brace)
        );
    }

    #[test]
    fn group_classification() {
        let mut table = Table::default();
        table.functions.insert("R");
        table.variables.insert("Z");
        let is_value = |src: &str, table: &Table| {
            let tokens = lex(src).unwrap();
            Tokenizer::new(&tokens).is_value(table)
        };
        assert!(is_value("1+2", &table));
        assert!(is_value("R Z", &table));
        assert!(is_value("R[]", &table));
        assert!(is_value("+(1 2)", &table));
        assert!(!is_value("/*-,1R", &table));
        assert!(!is_value("+{/+%N)", &table));
        assert!(!is_value("+(-)", &table));
    }

    #[test]
    fn statements() {
        let tokens = lex("X:1\n\nX+1\n").unwrap();
        assert_eq!(Tokenizer::statements(&tokens).count(), 2);
    }
}
