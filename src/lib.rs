//! An interpreter for Joe, a rank-polymorphic array notation in the family of APL and J
//!
//! Programs are read right to left by a stack reducer that applies monadic and
//! dyadic functions, adverbs, and conjunctions. Every call goes through a
//! rank-conformability engine that recurses into arguments deeper than the
//! function's rank before the function body ever sees them.
//!
//! # Example
//!
//! ```
//! use joe::Joe;
//!
//! let mut joe = Joe::new();
//! let result = joe.load_str("Mean 1 2 3 4 5 6").unwrap().unwrap();
//! assert_eq!(result.to_string(), "3.5");
//! ```

pub mod algorithm;
mod config;
mod env;
mod error;
mod function;
mod grid_fmt;
mod memo;
mod modifier;
mod reduce;
mod regression;
mod run;
mod run_prim;
mod value;

pub use joe_parser::{
    lex, Adverb, CodeSpan, Conjunction, Delim, Glyph, Ident, LexError, Lexeme, Loc, OperandKind,
    PadSpec, PrimClass, Primitive, RankSpec, Sp, SymbolTable, Token, Tokenizer, INFINITE_RANK,
};

pub use self::{
    config::*, env::*, error::*, function::*, grid_fmt::*, memo::*, regression::*, run::*,
    value::*,
};
