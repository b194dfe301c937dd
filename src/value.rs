use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use ecow::EcoVec;

/// A Joe value
///
/// Sequences are loose: their cells need not share a length or a depth.
#[derive(Clone)]
pub enum Value {
    Num(f64),
    Char(char),
    Seq(EcoVec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Seq(EcoVec::new())
    }
}

impl Value {
    /// The empty sequence
    pub fn empty() -> Self {
        Self::default()
    }
    /// Wrap a value in a one-cell sequence
    pub fn wrap(self) -> Self {
        Value::Seq(EcoVec::from([self]))
    }
    /// The nesting depth of the value
    ///
    /// Only the first cell of each sequence is followed, so a sequence whose
    /// later cells are deeper than its first reports the first cell's depth.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut value = self;
        while let Value::Seq(cells) = value {
            depth += 1;
            match cells.first() {
                Some(first) => value = first,
                None => break,
            }
        }
        depth
    }
    pub fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(cells) => Some(cells),
            _ => None,
        }
    }
    /// The cells of a sequence, or the value itself as a single cell
    pub fn into_cells(self) -> EcoVec<Value> {
        match self {
            Value::Seq(cells) => cells,
            scalar => EcoVec::from([scalar]),
        }
    }
    /// The number of cells, with scalars counting as one
    pub fn len(&self) -> usize {
        match self {
            Value::Seq(cells) => cells.len(),
            _ => 1,
        }
    }
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Seq(cells) if cells.is_empty())
    }
    /// Check if the value is a non-empty sequence of characters
    pub fn is_text(&self) -> bool {
        match self {
            Value::Seq(cells) => {
                !cells.is_empty() && cells.iter().all(|cell| matches!(cell, Value::Char(_)))
            }
            _ => false,
        }
    }
    /// The characters of a text value
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Char(c) => Some(c.to_string()),
            Value::Seq(cells) => cells.iter().map(Value::as_char).collect(),
            Value::Num(_) => None,
        }
    }
    /// Whether the value counts as true
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Num(n) => *n != 0.0,
            Value::Char(c) => *c != '\0',
            Value::Seq(cells) => !cells.is_empty(),
        }
    }
    /// Show the value the way a statement result is printed
    ///
    /// Text is shown bare. Everything else uses the bracketed form.
    pub fn show(&self) -> String {
        match self.as_text() {
            Some(text) if self.is_text() => text,
            _ => self.to_string(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Num(b as u8 as f64)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        s.chars().map(Value::Char).collect()
    }
}

impl From<EcoVec<Value>> for Value {
    fn from(cells: EcoVec<Value>) -> Self {
        Value::Seq(cells)
    }
}

impl From<Vec<Value>> for Value {
    fn from(cells: Vec<Value>) -> Self {
        cells.into_iter().collect()
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().collect())
    }
}

fn num_eq(a: f64, b: f64) -> bool {
    a == b || a.is_nan() && b.is_nan()
}

fn num_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => num_eq(*a, *b),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numbers sort before characters, which sort before sequences
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => num_cmp(*a, *b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Seq(a), Value::Seq(b)) => a.iter().cmp(b.iter()),
            (Value::Num(_), _) => Ordering::Less,
            (_, Value::Num(_)) => Ordering::Greater,
            (Value::Char(_), _) => Ordering::Less,
            (_, Value::Char(_)) => Ordering::Greater,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Num(n) => {
                0u8.hash(state);
                // -0 and 0 compare equal
                let n = if *n == 0.0 { 0.0 } else { *n };
                n.to_bits().hash(state);
            }
            Value::Char(c) => {
                1u8.hash(state);
                c.hash(state);
            }
            Value::Seq(cells) => {
                2u8.hash(state);
                cells.len().hash(state);
                for cell in cells {
                    cell.hash(state);
                }
            }
        }
    }
}

/// Format a number the way Joe prints it
pub fn format_num(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "∞" } else { "-∞" }.into()
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", format_num(*n)),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Seq(cells) => {
                write!(f, "[")?;
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    cell.fmt(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Value {
        ns.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn depth_follows_first_cell() {
        let deep_last: Value = vec![1.0.into(), nums(&[2.0])].into();
        assert_eq!(deep_last.depth(), nums(&[1.0, 2.0]).depth());
        assert_eq!(deep_last.depth(), 1);
        let deep_first: Value = vec![nums(&[1.0]), 2.0.into()].into();
        assert_eq!(deep_first.depth(), 2);
        assert_eq!(Value::empty().depth(), 1);
        assert_eq!(Value::from(3.0).depth(), 0);
        assert_eq!(Value::from("abc").depth(), 1);
    }

    #[test]
    fn display() {
        let pair: Value = vec!['a'.into(), 3.0.into()].into();
        let table: Value = vec![pair.clone(), pair].into();
        assert_eq!(table.to_string(), "[['a',3],['a',3]]");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(-3.0).to_string(), "-3");
        assert_eq!(Value::empty().to_string(), "[]");
        assert_eq!(Value::from("hi").show(), "hi");
        assert_eq!(Value::empty().show(), "[]");
        assert_eq!(nums(&[0.0, 1.0, 1.0]).show(), "[0,1,1]");
    }

    #[test]
    fn total_order() {
        let mut values = vec![
            Value::from("b"),
            Value::from('a'),
            Value::from(2.0),
            Value::from("ab"),
            Value::from(-1.0),
        ];
        values.sort();
        assert_eq!(
            values,
            [
                Value::from(-1.0),
                Value::from(2.0),
                Value::from('a'),
                Value::from("ab"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn hash_agrees_with_eq() {
        use std::collections::HashSet;
        let set: HashSet<Value> = [Value::from(0.0), Value::from(-0.0), Value::from(1.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
