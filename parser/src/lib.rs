//! The Joe lexer, tokenizer, and built-in tables

mod defs;
mod lex;
mod primitive;
mod rank;
mod tokenizer;

pub use {defs::*, lex::*, primitive::*, rank::*, tokenizer::*};

/// The name of a binding
pub type Ident = ecow::EcoString;
