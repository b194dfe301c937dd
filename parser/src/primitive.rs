use std::fmt;

use enum_iterator::{all, Sequence};

use crate::{Adverb, Conjunction, Primitive};

/// Categories of primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
#[allow(missing_docs)]
pub enum PrimClass {
    Arithmetic,
    Comparison,
    Structure,
    Selection,
    Set,
    Conversion,
    Misc,
}

impl PrimClass {
    /// Get an iterator over all primitive classes
    pub fn all() -> impl Iterator<Item = Self> {
        all()
    }
    /// Check if this class is pervasive
    pub fn is_pervasive(&self) -> bool {
        matches!(self, PrimClass::Arithmetic | PrimClass::Comparison)
    }
    /// Get an iterator over all primitives in this class
    pub fn primitives(self) -> impl Iterator<Item = Primitive> {
        Primitive::all().filter(move |prim| prim.class() == self)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Primitive {
    /// Get an iterator over all primitives
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        all()
    }
    /// Find a primitive by its name or glyph
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|p| p.name() == name)
    }
    /// Whether the primitive is named by a word rather than a glyph
    ///
    /// Word primitives live in the binding environment and can be rebound.
    pub fn is_word(&self) -> bool {
        self.name().starts_with(|c: char| c.is_ascii_uppercase())
    }
}

impl fmt::Display for Adverb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Adverb {
    /// Get an iterator over all adverbs
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        all()
    }
    /// Find an adverb by its name or glyph
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|a| a.name() == name)
    }
}

/// What a conjunction accepts as its left operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A value
    Value,
    /// A function
    Function,
    /// A function or an agenda
    FunctionOrAgenda,
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Conjunction {
    /// Get an iterator over all conjunctions
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        all()
    }
    /// Find a conjunction by its name or glyph
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|c| c.name() == name)
    }
    /// How tightly the conjunction binds
    ///
    /// Conjunctions of equal precedence associate to the left.
    pub fn precedence(&self) -> u8 {
        use Conjunction::*;
        match self {
            Rank | SeedFold => 1,
            Hook | HookFlip | HookRight => 2,
            Compose | ComposeRank | Agenda => 3,
        }
    }
    /// What the conjunction accepts on its left
    pub fn left_operand(&self) -> OperandKind {
        use Conjunction::*;
        match self {
            Rank | SeedFold => OperandKind::Value,
            Compose | Agenda => OperandKind::FunctionOrAgenda,
            ComposeRank | Hook | HookFlip | HookRight => OperandKind::Function,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Glyph;

    #[test]
    fn name_collisions() {
        let names: Vec<&str> = (Primitive::all().map(|p| p.name()))
            .chain(Adverb::all().map(|a| a.name()))
            .chain(Conjunction::all().map(|c| c.name()))
            .collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b, "{a:?} is defined twice");
            }
        }
    }

    #[test]
    fn primitive_from_name() {
        for prim in Primitive::all() {
            assert_eq!(Primitive::from_name(prim.name()), Some(prim));
        }
        assert_eq!(Primitive::from_name("Lr"), Some(Primitive::DropLast));
        assert_eq!(Primitive::from_name("M"), None);
        assert_eq!(Glyph::from_text("M"), Some(Glyph::Adverb(Adverb::Map)));
    }

    #[test]
    fn glyph_primitives_lex_as_glyphs() {
        for prim in Primitive::all().filter(|p| !p.is_word()) {
            let mut chars = prim.name().chars();
            let first = chars.next().unwrap();
            assert!(crate::GLYPH_CHARS.contains(first), "{prim:?}");
            assert!(chars.all(|c| crate::GLYPH_SUFFIXES.contains(c)), "{prim:?}");
        }
    }

    #[test]
    fn ranks() {
        use crate::RankSpec;
        assert_eq!(Primitive::Count.rank(), RankSpec::new(100, -1, 100));
        assert_eq!(Primitive::Last.rank(), RankSpec::new(100, 0, 100));
        assert_eq!(Primitive::Add.rank(), RankSpec::uniform(0));
        assert_eq!(Primitive::Join.pad(), crate::PadSpec::new(2, 1, 1));
        assert_eq!(Primitive::Add.pad(), crate::PadSpec::NONE);
        assert_eq!(Primitive::Print.rank(), RankSpec::new(100, 1, 100));
        assert_eq!(Primitive::Print.pad(), crate::PadSpec::new(0, 0, 1));
        assert_eq!(Primitive::Nest.rank(), RankSpec::uniform(100));
        assert_eq!(Primitive::from_name("Lt"), Some(Primitive::Nest));
    }

    #[test]
    fn pervasive_classes() {
        for prim in Primitive::all() {
            if prim.class().is_pervasive() {
                assert_eq!(prim.rank(), crate::RankSpec::uniform(0), "{prim:?}");
            }
        }
        assert!(PrimClass::all().all(|class| class.primitives().next().is_some()));
    }
}
