//! Algorithms for dyadic operations
//!
//! Wherever a sequence is expected, a scalar is treated as a one-cell
//! sequence.

use ecow::EcoVec;

use crate::{JoeError, JoeResult, Value};

use super::{as_int, as_ints, as_nat};

/// The most cells reserved up front for a repeated sequence
const MAX_RESERVE: usize = 1 << 16;

fn clamp_count(len: usize, n: u64) -> usize {
    usize::try_from(n).map_or(len, |n| n.min(len))
}

/// How many cells a signed count keeps: `n` of them, or all but `-n`
fn kept(len: usize, n: i64) -> usize {
    let count = clamp_count(len, n.unsigned_abs());
    if n >= 0 {
        count
    } else {
        len - count
    }
}

impl Value {
    /// Add a cell to the end
    pub fn append(self, cell: Value) -> Value {
        let mut cells = self.into_cells();
        cells.push(cell);
        cells.into()
    }
    /// Concatenate two sequences
    pub fn join(self, other: Value) -> Value {
        let mut cells = self.into_cells();
        cells.extend(other.into_cells());
        cells.into()
    }
    /// The cells of `self` that do not appear in `members`
    pub fn remove(self, members: &Value) -> Value {
        let members = members.clone().into_cells();
        (self.into_cells().into_iter())
            .filter(|cell| !members.contains(cell))
            .collect()
    }
    /// The cells of `self` that appear in `members`
    pub fn keep(self, members: &Value) -> Value {
        let members = members.clone().into_cells();
        (self.into_cells().into_iter())
            .filter(|cell| members.contains(cell))
            .collect()
    }
    /// The index of the first cell equal to `target`, or the length if none is
    pub fn index_of(&self, target: &Value) -> Value {
        let cells = self.clone().into_cells();
        cells
            .iter()
            .position(|cell| cell == target)
            .unwrap_or(cells.len())
            .into()
    }
    /// How many cells equal `target`
    pub fn count(&self, target: &Value) -> Value {
        let cells = self.clone().into_cells();
        cells.iter().filter(|cell| *cell == target).count().into()
    }
    /// Repeat the cells `n` times
    pub fn replicate(self, n: &Value) -> JoeResult<Value> {
        let n = as_nat(n, "Repetition count")?;
        let cells = self.into_cells();
        if cells.is_empty() {
            return Ok(Value::empty());
        }
        let total = cells.len().checked_mul(n).ok_or_else(|| {
            JoeError::shape(format!("Cannot repeat {} cells {n} times", cells.len()))
        })?;
        let mut repeated = EcoVec::new();
        repeated.reserve(total.min(MAX_RESERVE));
        for _ in 0..n {
            repeated.extend(cells.iter().cloned());
        }
        Ok(repeated.into())
    }
    /// The first `n` cells, or all but the last `-n` cells
    pub fn take(self, n: &Value) -> JoeResult<Value> {
        let n = as_int(n, "Count")?;
        let cells = self.into_cells();
        let end = kept(cells.len(), n);
        Ok(cells[..end].iter().cloned().collect())
    }
    /// The last `n` cells, or all but the first `-n` cells
    pub fn take_last(self, n: &Value) -> JoeResult<Value> {
        let n = as_int(n, "Count")?;
        let cells = self.into_cells();
        let start = cells.len() - kept(cells.len(), n);
        Ok(cells[start..].iter().cloned().collect())
    }
    /// Drop the first `n` cells, or keep the last `-n` cells
    pub fn drop_first(self, n: &Value) -> JoeResult<Value> {
        let n = as_int(n, "Count")?;
        let cells = self.into_cells();
        let start = if n >= 0 {
            clamp_count(cells.len(), n.unsigned_abs())
        } else {
            cells.len() - clamp_count(cells.len(), n.unsigned_abs())
        };
        Ok(cells[start..].iter().cloned().collect())
    }
    /// Drop the last `n` cells, or keep the first `-n` cells
    pub fn drop_last(self, n: &Value) -> JoeResult<Value> {
        let n = as_int(n, "Count")?;
        let cells = self.into_cells();
        let end = if n >= 0 {
            cells.len() - clamp_count(cells.len(), n.unsigned_abs())
        } else {
            clamp_count(cells.len(), n.unsigned_abs())
        };
        Ok(cells[..end].iter().cloned().collect())
    }
    /// The cell at an index, counting from the end if negative
    pub fn pick(self, index: &Value) -> JoeResult<Value> {
        let i = as_int(index, "Index")?;
        let cells = self.into_cells();
        let len = cells.len() as i64;
        let j = if i < 0 { len + i } else { i };
        if j < 0 || j >= len {
            return Err(JoeError::shape(format!(
                "Index {i} is out of bounds of length {len}"
            )));
        }
        Ok(cells[j as usize].clone())
    }
    /// Reorder the cells of `self` by the stable sort order of `keys`
    pub fn permute_by(self, keys: &Value) -> JoeResult<Value> {
        let cells = self.into_cells();
        keys.grade()
            .into_iter()
            .map(|i| {
                cells.get(i).cloned().ok_or_else(|| {
                    JoeError::shape(format!(
                        "Cannot sort {} cells by {} keys",
                        cells.len(),
                        keys.len()
                    ))
                })
            })
            .collect()
    }
    /// Split the cells on occurrences of a subsequence
    pub fn split(self, sep: &Value) -> JoeResult<Value> {
        let sep = sep.clone().into_cells();
        if sep.is_empty() {
            return Err(JoeError::shape("Cannot split on an empty separator"));
        }
        let cells = self.into_cells();
        let mut parts = EcoVec::new();
        let mut part = EcoVec::new();
        let mut i = 0;
        while i < cells.len() {
            if cells[i..].starts_with(&sep) {
                parts.push(Value::Seq(std::mem::take(&mut part)));
                i += sep.len();
            } else {
                part.push(cells[i].clone());
                i += 1;
            }
        }
        parts.push(Value::Seq(part));
        Ok(parts.into())
    }
    /// Concatenate the cells with a separator between each pair
    pub fn splice(self, sep: &Value) -> Value {
        let sep = sep.clone().into_cells();
        let mut joined = EcoVec::new();
        for (i, cell) in self.into_cells().into_iter().enumerate() {
            if i > 0 {
                joined.extend(sep.iter().cloned());
            }
            joined.extend(cell.into_cells());
        }
        joined.into()
    }
    /// Shape the scalars into nested sequences of the given dimensions
    ///
    /// The first dimension is the innermost, so `2 3T` makes three rows of
    /// two. Scalars are reused from the start if there are too few.
    pub fn reshape(self, dims: &Value) -> JoeResult<Value> {
        let dims = as_ints(dims, "Dimension")?;
        let Some((_, inner)) = dims.split_last() else {
            return Err(JoeError::shape("Reshape needs at least one dimension"));
        };
        let mut total: usize = 1;
        for &d in &dims {
            let d = usize::try_from(d).map_err(|_| {
                JoeError::shape(format!("Dimensions must be non-negative, but one is {d}"))
            })?;
            total = total
                .checked_mul(d)
                .ok_or_else(|| JoeError::shape("Reshape dimensions are too large"))?;
        }
        if total == 0 {
            return Ok(Value::empty());
        }
        let leaves = self.flatten().into_cells();
        if leaves.is_empty() {
            return Err(JoeError::shape("Cannot reshape an empty sequence"));
        }
        let mut flat: Vec<Value> = leaves.iter().cycle().take(total).cloned().collect();
        for &d in inner {
            flat = flat
                .chunks(d as usize)
                .map(|chunk| chunk.iter().cloned().collect())
                .collect();
        }
        Ok(flat.into())
    }
    /// Fill the `{}` and `{i}` holes of a text template with shown cells
    ///
    /// `{{` and `}}` stand for literal braces.
    pub fn fill_template(&self, args: Value) -> JoeResult<String> {
        let template = self.as_text().ok_or_else(|| {
            JoeError::type_error(format!("A template must be text, but it is {self}"))
        })?;
        let args = args.into_cells();
        let mut filled = String::new();
        let mut next = 0;
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut hole = String::new();
                    loop {
                        match chars.next() {
                            Some('{') if hole.is_empty() => {
                                filled.push('{');
                                break;
                            }
                            Some('}') => {
                                let i = if hole.is_empty() {
                                    next += 1;
                                    next - 1
                                } else {
                                    hole.trim().parse().map_err(|_| {
                                        JoeError::shape(format!("Invalid template hole {{{hole}}}"))
                                    })?
                                };
                                let arg = args.get(i).ok_or_else(|| {
                                    JoeError::shape(format!(
                                        "Template hole {i} has no value among {} cells",
                                        args.len()
                                    ))
                                })?;
                                filled.push_str(&arg.show());
                                break;
                            }
                            Some(c) => hole.push(c),
                            None => return Err(JoeError::shape("Unclosed template hole")),
                        }
                    }
                }
                '}' => {
                    if chars.next() != Some('}') {
                        return Err(JoeError::shape("Unmatched closing brace in template"));
                    }
                    filled.push('}');
                }
                c => filled.push(c),
            }
        }
        Ok(filled)
    }
    /// Wrap the value in `n` levels of sequence
    pub fn wrap_n(self, n: &Value) -> JoeResult<Value> {
        let n = as_nat(n, "Wrap count")?;
        Ok((0..n).fold(self, |value, _| value.wrap()))
    }
}

/// The integers from `start` to `end`, both included
pub fn range_between(start: f64, end: f64) -> JoeResult<Value> {
    let start = as_int(&start.into(), "Range bound")?;
    let end = as_int(&end.into(), "Range bound")?;
    Ok(if start <= end {
        (start..=end).map(|i| Value::from(i as f64)).collect()
    } else {
        (end..=start).rev().map(|i| Value::from(i as f64)).collect()
    })
}
