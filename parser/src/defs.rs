//! All primitive definitions

use enum_iterator::Sequence;
use serde::*;

use crate::{PadSpec, PrimClass, RankSpec};

macro_rules! primitive {
    ($(
        #[doc = $doc_rust:literal]
        $(#[doc = $doc:literal])*
        ($variant:ident, $class:ident, $name:literal, $rank:expr $(, $pad:expr)?)
    ),* $(,)?) => {
        /// A built-in function
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Primitive {
            $(
                #[doc = $doc_rust]
                $variant,
            )*
        }

        impl Primitive {
            /// Get the primitive's name or glyph
            pub fn name(&self) -> &'static str {
                match self {
                    $(Primitive::$variant => $name,)*
                }
            }
            /// Get the primitive's class
            pub fn class(&self) -> PrimClass {
                match self {
                    $(Primitive::$variant => PrimClass::$class,)*
                }
            }
            /// Get the primitive's rank
            pub fn rank(&self) -> RankSpec {
                match self {
                    $(Primitive::$variant => RankSpec::from($rank),)*
                }
            }
            /// Get the primitive's pad depths
            #[allow(unreachable_code)]
            pub fn pad(&self) -> PadSpec {
                match self {
                    $(Primitive::$variant => {
                        $(return PadSpec::from($pad);)?
                        PadSpec::NONE
                    })*
                }
            }
            /// Get the primitive's documentation
            pub fn doc(&self) -> &'static str {
                match self {
                    $(Primitive::$variant => concat!($doc_rust, $("\n", $doc),*),)*
                }
            }
        }
    };
}

const INF: i32 = crate::INFINITE_RANK;

primitive!(
    /// Add two values, or leave one unchanged
    (Add, Arithmetic, "+", 0),
    /// Subtract the right value from the left one, or negate
    (Sub, Arithmetic, "-", 0),
    /// Multiply two values, or take the sign of one
    (Mul, Arithmetic, "*", 0),
    /// Divide the left value by the right one, or take the reciprocal
    (Div, Arithmetic, "%", 0),
    /// The right value modulo the left one, or the absolute value
    (Residue, Arithmetic, "|", 0),
    /// The number of ways to choose the right count out of the left
    ///
    /// Monadically, the factorial.
    (Factorial, Arithmetic, "!", 0),
    /// Compare for less than, or check for negatives
    (Less, Comparison, "<", 0),
    /// Compare for greater than, or check for positives
    (Greater, Comparison, ">", 0),
    /// Compare for equality, or check for zeros
    (Equal, Comparison, "=", 0),
    /// Compare for less or equal, or decrement
    (LessEq, Comparison, "<:", 0),
    /// Compare for greater or equal, or increment
    (GreaterEq, Comparison, ">:", 0),
    /// The lesser of two values
    (Min, Comparison, "<,", 0),
    /// The greater of two values
    (Max, Comparison, ">,", 0),
    /// Append the right value as the final cell of the left one
    ///
    /// Monadically, wrap the value in a sequence.
    (Append, Structure, "+,", INF, (0, 1, 0)),
    /// Concatenate two sequences, or join the cells of one
    (Join, Structure, ";", INF, (2, 1, 1)),
    /// Pair two values, or flatten one completely
    (Pair, Structure, ";,", INF, (1, 0, 0)),
    /// Remove the cells of the right sequence that appear in the left one
    ///
    /// Monadically, remove zeros.
    (Remove, Set, "-,", INF, (1, 1, 1)),
    /// Keep the cells of the right sequence that appear in the left one
    ///
    /// Monadically, remove duplicates.
    (Nub, Set, "-:", INF, (1, 1, 1)),
    /// Find the index of the left value in the right sequence
    ///
    /// Monadically, the indices of the non-zero cells.
    (IndexOf, Set, "?", INF, (1, 0, 1)),
    /// Repeat the right value left times, or take its length
    (Replicate, Structure, "#", (0, INF), (1, 0, 1)),
    /// The right argument
    (Identity, Misc, "A", INF),
    /// The left argument, or the right one if alone
    (Left, Misc, "B", INF),
    /// Count the occurrences of the left value in the right sequence
    (Count, Selection, "C", (-1, INF), (1, 0, 1)),
    /// The depth of a value, following first cells
    (Depth, Misc, "D", INF),
    /// The last cell, or the last left cells
    (Last, Selection, "E", (0, INF), (1, 0, 1)),
    /// Parse a number from text
    (Parse, Conversion, "F", (1, INF, 1), (1, 0, 1)),
    /// The first cell, or the first left cells
    (First, Selection, "H", (0, INF), (1, 0, 1)),
    /// Combine digits in the left base, 10 by default
    (FromBase, Conversion, "I", (1, 0, 1), (1, 0, 1)),
    /// The digits of a number in the left base, 10 by default
    (ToBase, Conversion, "Id", 0),
    /// Join the cells of the right sequence with the left separator
    (Splice, Structure, "J", (INF, 1, INF), (2, 1, 2)),
    /// The number of cells
    (Len, Misc, "L", INF),
    /// Drop the first cell, or the first left cells
    (DropFirst, Selection, "Ld", (0, INF), (1, 0, 1)),
    /// Drop the last cell, or the last left cells
    (DropLast, Selection, "Lr", (0, INF), (1, 0, 1)),
    /// Pick the cell at the left index
    ///
    /// Negative indices count from the end. Monadically, the number of cells.
    (Index, Selection, "N", (0, INF), (1, 0, 1)),
    /// Wrap a value twice
    (Nest, Structure, "Lt", INF),
    /// Print a value, or the right cells filled into the left template
    ///
    /// The result is always 0.
    (Print, Misc, "P", (INF, 1, INF), (0, 0, 1)),
    /// Sort ascending, or permute the left sequence by the order of the right one
    (Sort, Structure, "O", INF, (1, 1, 1)),
    /// The numbers up to but excluding a bound, or between two bounds inclusive
    (Range, Structure, "R", 0),
    /// Split the right sequence on the left separator, spaces by default
    (Split, Structure, "S", INF, (1, 1, 1)),
    /// Shape the right sequence into the left dimensions
    ///
    /// Monadically, shape the natural numbers.
    (Table, Structure, "T", 1, 1),
    /// Format a value as text
    (Format, Conversion, "U", INF),
    /// Reverse the cells of a sequence
    (Reverse, Structure, "V", INF, (1, 0, 1)),
    /// Wrap a value in a sequence, left times
    (Wrap, Structure, "W", (0, INF)),
);

macro_rules! modifier {
    ($kind:ident, $what:literal, $(
        #[doc = $doc_rust:literal]
        $(#[doc = $doc:literal])*
        ($variant:ident, $name:literal)
    ),* $(,)?) => {
        #[doc = concat!("A built-in ", $what)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $kind {
            $(
                #[doc = $doc_rust]
                $variant,
            )*
        }

        impl $kind {
            #[doc = concat!("Get the ", $what, "'s name or glyph")]
            pub fn name(&self) -> &'static str {
                match self {
                    $($kind::$variant => $name,)*
                }
            }
            #[doc = concat!("Get the ", $what, "'s documentation")]
            pub fn doc(&self) -> &'static str {
                match self {
                    $($kind::$variant => concat!($doc_rust, $("\n", $doc),*),)*
                }
            }
        }
    };
}

modifier!(
    Adverb,
    "adverb",
    /// Fold from the right, with the accumulator on the right
    (Fold, "/"),
    /// Call a function with its argument on both sides
    (Selfie, "~"),
    /// Call a function on each cell
    (Map, "M"),
    /// Prefixes, sliding windows, or chunks of a sequence
    (Windows, "\\"),
);

modifier!(
    Conjunction,
    "conjunction",
    /// Override the rank of a function
    (Rank, "^"),
    /// Fold with a fixed seed
    (SeedFold, "/,"),
    /// Compose two functions, or dispatch an agenda
    (Compose, "@"),
    /// Compose two functions, keeping the inner function's rank
    (ComposeRank, "@:"),
    /// Build or extend an agenda
    (Agenda, "`"),
    /// Pass the left argument and the inner result
    (Hook, "$"),
    /// Pass the inner result and the left argument
    (HookFlip, "$,"),
    /// Pass the right argument and the inner result
    (HookRight, "$:"),
);
