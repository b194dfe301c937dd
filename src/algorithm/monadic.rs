//! Algorithms for monadic operations

use ecow::EcoVec;
use indexmap::IndexSet;

use crate::{JoeError, JoeResult, Value};

use super::as_int;

impl Value {
    /// The first cell, or empty for an empty sequence
    pub fn first(self) -> Value {
        self.into_cells().first().cloned().unwrap_or_default()
    }
    /// The last cell, or empty for an empty sequence
    pub fn last(self) -> Value {
        self.into_cells().last().cloned().unwrap_or_default()
    }
    pub fn reverse(self) -> Value {
        self.into_cells().iter().rev().cloned().collect()
    }
    /// Sort the cells ascending, keeping equal cells in order
    pub fn sorted(self) -> Value {
        let mut cells = self.into_cells();
        cells.make_mut().sort();
        cells.into()
    }
    /// The stable sort order of the cells
    pub fn grade(&self) -> Vec<usize> {
        let cells = self.as_seq().unwrap_or(std::slice::from_ref(self));
        let mut indices: Vec<usize> = (0..cells.len()).collect();
        indices.sort_by(|&a, &b| cells[a].cmp(&cells[b]));
        indices
    }
    /// Remove duplicate cells, keeping the first of each
    pub fn nub(self) -> Value {
        let unique: IndexSet<Value> = self.into_cells().into_iter().collect();
        unique.into_iter().collect()
    }
    /// Concatenate the cells of each cell
    pub fn raze(self) -> Value {
        let mut cells = EcoVec::new();
        for cell in self.into_cells() {
            cells.extend(cell.into_cells());
        }
        cells.into()
    }
    /// Every scalar, in order
    pub fn flatten(self) -> Value {
        let mut leaves = EcoVec::new();
        let mut stack = vec![self];
        while let Some(value) = stack.pop() {
            match value {
                Value::Seq(cells) => stack.extend(cells.iter().rev().cloned()),
                scalar => leaves.push(scalar),
            }
        }
        leaves.into()
    }
    /// The indices of the truthy cells
    pub fn truthy_indices(self) -> Value {
        (self.into_cells().iter().enumerate())
            .filter(|(_, cell)| cell.is_truthy())
            .map(|(i, _)| i.into())
            .collect()
    }
    /// Combine digits in a base
    ///
    /// Digits may be numbers or characters.
    pub fn from_digits(self, base: f64) -> JoeResult<Value> {
        let mut n = 0.0;
        for cell in self.into_cells() {
            let digit = match cell {
                Value::Num(d) => d,
                Value::Char(c) => c.to_digit(36).map(f64::from).ok_or_else(|| {
                    JoeError::type_error(format!("{c:?} is not a digit"))
                })?,
                Value::Seq(_) => return Err(JoeError::type_error("Digits must be scalars")),
            };
            if digit >= base {
                return Err(JoeError::shape(format!(
                    "Digit {digit} is out of range for base {base}"
                )));
            }
            n = n * base + digit;
        }
        Ok(n.into())
    }
    /// Parse a number from text
    pub fn parse_num(&self) -> JoeResult<Value> {
        let text = match self.as_text() {
            Some(text) => text,
            None => {
                return Err(JoeError::type_error(format!(
                    "Cannot parse {self} as a number"
                )))
            }
        };
        let trimmed = text.trim().replace('_', "-");
        trimmed
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| JoeError::type_error(format!("Cannot parse {text:?} as a number")))
    }
    /// Format the value as text
    pub fn format(&self) -> Value {
        Value::from(self.show().as_str())
    }
}

/// The digits of a number in a base, most significant first
pub fn digits(n: f64, base: f64) -> JoeResult<Value> {
    let base = as_int(&base.into(), "Base")?;
    if base < 2 {
        return Err(JoeError::shape(format!("Base must be at least 2, but it is {base}")));
    }
    let negative = n < 0.0;
    let mut n = n.abs().floor() as u64;
    let base = base as u64;
    let mut digits = Vec::new();
    loop {
        digits.push((n % base) as f64);
        n /= base;
        if n == 0 {
            break;
        }
    }
    Ok(digits
        .into_iter()
        .rev()
        .map(|d| if negative { -d } else { d })
        .map(Value::from)
        .collect())
}

/// The integers from zero up to but excluding `n`
///
/// A negative `n` counts down.
pub fn range(n: f64) -> JoeResult<Value> {
    let n = as_int(&n.into(), "Range bound")?;
    Ok(if n >= 0 {
        (0..n).map(|i| Value::from(i as f64)).collect()
    } else {
        (n + 1..=0).rev().map(|i| Value::from(i as f64)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Value {
        ns.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn sort_and_grade() {
        let v = nums(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(v.grade(), [1, 3, 2, 0]);
        assert_eq!(v.sorted(), nums(&[1.0, 1.0, 2.0, 3.0]));
    }

    #[test]
    fn nub_keeps_first() {
        assert_eq!(Value::from("dsaasafd").nub(), Value::from("dsaf"));
    }

    #[test]
    fn flatten_and_raze() {
        let nested = Value::from_iter([nums(&[1.0, 2.0]), Value::from_iter([nums(&[3.0])])]);
        assert_eq!(nested.clone().flatten(), nums(&[1.0, 2.0, 3.0]));
        assert_eq!(
            nested.raze(),
            Value::from_iter([1.0.into(), 2.0.into(), nums(&[3.0])])
        );
    }

    #[test]
    fn bases() {
        assert_eq!(digits(123.0, 10.0).unwrap(), nums(&[1.0, 2.0, 3.0]));
        assert_eq!(digits(0.0, 2.0).unwrap(), nums(&[0.0]));
        assert_eq!(digits(6.0, 2.0).unwrap(), nums(&[1.0, 1.0, 0.0]));
        assert!(digits(6.0, 1.0).is_err());
        assert_eq!(Value::from("ff").from_digits(16.0).unwrap(), Value::from(255.0));
        assert_eq!(nums(&[1.0, 0.0, 1.0]).from_digits(2.0).unwrap(), Value::from(5.0));
    }

    #[test]
    fn ranges() {
        assert_eq!(range(3.0).unwrap(), nums(&[0.0, 1.0, 2.0]));
        assert_eq!(range(-3.0).unwrap(), nums(&[0.0, -1.0, -2.0]));
        assert_eq!(range(0.0).unwrap(), Value::empty());
    }

    #[test]
    fn parsing() {
        assert_eq!(Value::from("_2.5").parse_num().unwrap(), Value::from(-2.5));
        assert!(Value::from("abc").parse_num().is_err());
        assert_eq!(Value::from(12.0).format(), Value::from("12"));
    }
}
